use super::*;

#[test]
fn test_invalid_values_rejected() {
    for bad in ["-1", "Thirteen", "", " 1", "+1", "1.0"] {
        assert!(
            bad.parse::<VersionNumber>().is_err(),
            "'{bad}' should not parse"
        );
    }
    assert!(VersionNumber::new(-1).is_err());
    assert!(VersionNumber::try_from(-42i64).is_err());
}

#[test]
fn test_string_and_integer_agree() {
    for n in [0u64, 1, 2, 9, 10, 99, 100, 12345] {
        let from_str: VersionNumber = n.to_string().parse().unwrap();
        assert_eq!(from_str, VersionNumber::from(n));
    }
    assert_eq!("007".parse::<VersionNumber>().unwrap(), 7);
}

#[test]
fn test_display_and_debug() {
    assert_eq!(VersionNumber::from(2u32).to_string(), "2");
    assert_eq!(format!("{:?}", VersionNumber::from(2u32)), "VersionNumber(2)");
}

#[test]
fn test_add() {
    let one = VersionNumber::from(1u32);
    assert_eq!((one + one).unwrap(), VersionNumber::from(2u32));
    assert_eq!((one + 1).unwrap(), 2);
    assert_eq!(one.next().unwrap(), 2);
}

#[test]
fn test_add_overflow() {
    let max = VersionNumber::from(u64::MAX);
    let err = max.next().unwrap_err();
    assert!(matches!(err, CoreError::VersionOverflow { .. }));
    assert!((max + VersionNumber::from(1u32)).is_err());
    assert_eq!((max + 0).unwrap(), max);
}

#[test]
fn test_sub() {
    assert_eq!((VersionNumber::from(1u32) - 1).unwrap(), 0);
    let err = (VersionNumber::ZERO - 1).unwrap_err();
    assert!(matches!(err, CoreError::VersionUnderflow { .. }));
    assert!((VersionNumber::from(3u32) - VersionNumber::from(4u32)).is_err());
}

#[test]
fn test_ordering() {
    let one = VersionNumber::from(1u32);
    let two = VersionNumber::from(2u32);
    assert!(one < two);
    assert!(two > one);
    assert!(one <= one);
    assert!(one >= one);
    assert!(one != two);
    assert!(one < 2);
    assert!(!(two < 1));
}

#[test]
fn test_range_over_values() {
    let v = VersionNumber::from(3u32);
    let empty: Vec<u64> = (v.value()..v.value()).collect();
    assert!(empty.is_empty());
}

#[test]
fn test_serde_transparent() {
    let v: VersionNumber = serde_yaml::from_str("12").unwrap();
    assert_eq!(v, 12);
    assert!(serde_yaml::from_str::<VersionNumber>("-3").is_err());
}
