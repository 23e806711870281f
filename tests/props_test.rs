use std::io::Write;
use tempfile::NamedTempFile;
use wskutil::props::{api_base, host_base, Properties};
use wskutil::Error;

#[test]
fn parse_reads_key_value_lines() {
    let props = Properties::parse("# comment\nAPIHOST=\nnamespace = team \n\nAUTH=user:pass\nbogus line\n");
    assert_eq!(props.get("namespace"), Some("team"));
    assert_eq!(props.get("AUTH"), Some("user:pass"));
    assert_eq!(props.get("APIHOST"), Some(""));
    assert_eq!(props.get("bogus line"), None);
}

#[test]
fn load_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let props = Properties::load(&dir.path().join("absent")).unwrap();
    assert_eq!(props, Properties::new());
}

#[test]
fn load_reads_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "apihost=localhost:8443").unwrap();
    writeln!(file, "apiversion=v1").unwrap();
    let props = Properties::load(file.path()).unwrap();
    assert_eq!(api_base(&props).unwrap(), "https://localhost:8443/api/v1");
}

#[test]
fn load_directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Properties::load(dir.path()).expect_err("a directory is not a property file");
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn host_base_adds_https_to_bare_hosts() {
    let bare: Properties = [("apihost", "openwhisk.example.com")].into_iter().collect();
    assert_eq!(host_base(&bare).unwrap(), "https://openwhisk.example.com");

    let http: Properties = [("apihost", "http://172.17.0.1:10001")].into_iter().collect();
    assert_eq!(host_base(&http).unwrap(), "http://172.17.0.1:10001");
}

#[test]
fn api_base_appends_version() {
    let props: Properties = [("apihost", "example.com"), ("apiversion", "v1")]
        .into_iter()
        .collect();
    assert_eq!(api_base(&props).unwrap(), "https://example.com/api/v1");
}

#[test]
fn missing_properties_are_reported() {
    let err = host_base(&Properties::new()).unwrap_err();
    assert!(matches!(err, Error::MissingProperty(ref key) if key == "apihost"));

    let props: Properties = [("apihost", "example.com")].into_iter().collect();
    let err = api_base(&props).unwrap_err();
    assert!(matches!(err, Error::MissingProperty(ref key) if key == "apiversion"));
}

#[test]
fn default_path_honours_override() {
    assert_eq!(
        Properties::default_path_from(Some("/tmp/custom.wskprops".into())),
        std::path::PathBuf::from("/tmp/custom.wskprops")
    );
}

#[test]
fn default_path_without_override_is_in_home() {
    assert!(Properties::default_path_from(None).ends_with(".wskprops"));
    assert!(Properties::default_path_from(Some("  ".into())).ends_with(".wskprops"));
}
