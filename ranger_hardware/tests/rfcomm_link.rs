use std::fs;

use ranger_hardware::RfcommLink;
use ranger_traits::RadioLink;
use tempfile::tempdir;

#[test]
fn missing_device_is_not_connected() {
    let dir = tempdir().unwrap();
    let mut link = RfcommLink::new(dir.path().join("rfcomm0"));
    assert!(!link.is_connected());
    assert!(link.send(b"1000\n").is_err());
}

#[test]
fn writable_device_connects_and_receives_lines() {
    let dir = tempdir().unwrap();
    let dev = dir.path().join("rfcomm0");
    fs::write(&dev, b"").unwrap();

    let mut link = RfcommLink::new(&dev);
    link.start_advertising().unwrap();
    assert!(link.is_connected());
    link.send(b"1234\n").unwrap();
    link.send(b"1240\n").unwrap();

    assert_eq!(fs::read_to_string(&dev).unwrap(), "1234\n1240\n");
}
