use std::io::Cursor;

use parquet_lite::dump::dump_metadata;
use parquet_lite::{Error, Result};

use super::fixture;

#[test]
fn report_covers_schema_and_pages() -> Result<()> {
    let bytes = fixture::i32_file(&[&[1, 2, 3], &[4, 5]]);
    let mut reader = Cursor::new(bytes);
    let mut out = Vec::new();
    dump_metadata(&mut reader, &mut out)?;
    let report = String::from_utf8(out).unwrap();

    assert!(report.contains("version: 1"));
    assert!(report.contains("num rows: 5"));
    assert!(report.contains("created by: parquet-lite tests"));
    assert!(report.contains("REQUIRED id Int32"));
    assert!(report.contains("row group 0: 3 rows"));
    assert!(report.contains("row group 1: 2 rows"));
    assert!(report.contains("data page: 3 values, PLAIN encoded"));
    Ok(())
}

#[test]
fn dump_rejects_non_parquet_input() {
    let mut reader = Cursor::new(b"definitely not parquet".to_vec());
    let mut out = Vec::new();
    assert!(matches!(
        dump_metadata(&mut reader, &mut out),
        Err(Error::NotAParquetFile(_))
    ));
}
