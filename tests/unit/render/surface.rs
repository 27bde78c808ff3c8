use super::*;

#[test]
fn zero_sized_surfaces_are_rejected() {
    assert!(matches!(
        Surface::new(0, 4),
        Err(RetouchError::Validation(_))
    ));
    assert!(matches!(
        Surface::new(4, 0),
        Err(RetouchError::Validation(_))
    ));
}

#[test]
fn from_premul_checks_length() {
    assert!(Surface::from_rgba8_premul(2, 2, vec![0; 16]).is_ok());
    let err = Surface::from_rgba8_premul(2, 2, vec![0; 15]).unwrap_err();
    assert!(err.to_string().contains("does not match"));
}

#[test]
fn pixel_access_is_bounds_safe() {
    let mut s = Surface::new(3, 2).unwrap();
    let red = Rgba8Premul::from_straight_rgba(255, 0, 0, 255);
    s.set_pixel(2, 1, red);
    s.set_pixel(3, 0, red);
    assert_eq!(s.pixel(2, 1), red);
    assert_eq!(s.pixel(9, 9), Rgba8Premul::transparent());
    assert_eq!(s.data().iter().filter(|&&b| b == 255).count(), 2);
}

#[test]
fn straight_input_is_premultiplied() {
    let s = Surface::from_rgba8_straight(1, 1, vec![200, 100, 50, 0]).unwrap();
    assert_eq!(s.data(), &[0, 0, 0, 0]);
}

#[test]
fn fingerprint_tracks_content() {
    let a = Surface::filled(4, 4, Rgba8Premul::from_straight_rgba(1, 2, 3, 255)).unwrap();
    let mut b = a.clone();
    assert_eq!(a.fingerprint(), b.fingerprint());
    b.set_pixel(0, 0, Rgba8Premul::transparent());
    assert_ne!(a.fingerprint(), b.fingerprint());
}

#[test]
fn snapshot_does_not_alias_source() {
    let mut s = Surface::filled(2, 2, Rgba8Premul::from_straight_rgba(9, 9, 9, 255)).unwrap();
    let snap = Snapshot::capture(&s);
    s.fill(Rgba8Premul::transparent());
    assert_eq!(snap.surface().pixel(1, 1).a, 255);
    assert_eq!(snap.to_surface().width(), 2);
}
