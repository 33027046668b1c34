use romcheck_core::manifest;
use romcheck_core::{ManifestError, VerifyError};
use std::fs;

#[test]
fn parses_a_logiqx_style_dat() {
    let td = tempfile::tempdir().unwrap();
    let dat = td.path().join("nes.dat");
    fs::write(
        &dat,
        r#"<?xml version="1.0"?>
<!DOCTYPE datafile PUBLIC "-//Logiqx//DTD ROM Management Datafile//EN" "http://www.logiqx.com/Dats/datafile.dtd">
<datafile>
	<header>
		<name>Nintendo - Nintendo Entertainment System</name>
		<version>20240101</version>
	</header>
	<game name="10-Yard Fight (USA, Europe)">
		<description>10-Yard Fight (USA, Europe)</description>
		<rom name="10-Yard Fight (USA, Europe).nes" size="40976" crc="3d564757" sha1="016818bd8f2d2d2e6f4c9c5e9a1b6d7f0a1b2c3d" sha256="0F2D3A5C1B6E7F8091A2B3C4D5E6F708192A3B4C5D6E7F8091A2B3C4D5E6F708"/>
	</game>
	<game name="1942 (Japan, USA)">
		<rom name="1942 (Japan, USA).nes" size="40976" sha256="aa00000000000000000000000000000000000000000000000000000000000000"/>
	</game>
</datafile>
"#,
    )
    .unwrap();

    let index = manifest::parse(&dat).unwrap();
    assert_eq!(index.len(), 2);
    let e = index.get("10-Yard Fight (USA, Europe).nes").unwrap();
    assert_eq!(e.container_name, "10-Yard Fight (USA, Europe)");
    assert_eq!(e.expected_size, 40976);
    assert_eq!(
        e.expected_digest,
        "0f2d3a5c1b6e7f8091a2b3c4d5e6f708192a3b4c5d6e7f8091a2b3c4d5e6f708"
    );
}

#[test]
fn unreadable_path_is_a_read_error() {
    let td = tempfile::tempdir().unwrap();
    let err = manifest::parse(&td.path().join("absent.dat")).unwrap_err();
    assert!(matches!(err, VerifyError::ManifestRead { .. }));
}

#[test]
fn malformed_xml_is_a_parse_error() {
    let td = tempfile::tempdir().unwrap();
    let dat = td.path().join("broken.dat");
    fs::write(&dat, "<datafile><game name=\"x\"><rom name=\"a\" sha256=\"aa\"></datafile>").unwrap();
    let err = manifest::parse(&dat).unwrap_err();
    assert!(matches!(err, VerifyError::ManifestParse { source: ManifestError::Xml(_), .. }));
    assert!(err.to_string().contains("broken.dat"));
}

#[test]
fn non_utf8_is_a_parse_error() {
    let td = tempfile::tempdir().unwrap();
    let dat = td.path().join("latin1.dat");
    fs::write(&dat, b"<datafile><game name=\"\xE9\"/></datafile>").unwrap();
    let err = manifest::parse(&dat).unwrap_err();
    assert!(matches!(err, VerifyError::ManifestParse { source: ManifestError::Encoding(_), .. }));
}

#[test]
fn bad_size_fails_the_whole_manifest() {
    let td = tempfile::tempdir().unwrap();
    let dat = td.path().join("sizes.dat");
    fs::write(
        &dat,
        r#"<datafile>
  <game name="A"><rom name="a.bin" size="16" sha256="aa"/></game>
  <game name="B"><rom name="b.bin" size="-1" sha256="bb"/></game>
</datafile>"#,
    )
    .unwrap();
    let err = manifest::parse(&dat).unwrap_err();
    match err {
        VerifyError::ManifestParse { source: ManifestError::InvalidSize { rom, value }, .. } => {
            assert_eq!(rom, "b.bin");
            assert_eq!(value, "-1");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn bad_size_on_skipped_rom_is_ignored() {
    let td = tempfile::tempdir().unwrap();
    let dat = td.path().join("skip.dat");
    fs::write(
        &dat,
        r#"<datafile><game name="A"><rom name="a.bin" size="junk"/></game></datafile>"#,
    )
    .unwrap();
    assert!(manifest::parse(&dat).unwrap().is_empty());
}
