//! A minimal in-memory Parquet writer, enough to produce well-formed (and
//! deliberately malformed) files for the reader to decode.
#![allow(dead_code)]

pub fn varint(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            break;
        }
        out.push(byte | 0x80);
    }
}

pub fn zigzag(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

fn list_header(out: &mut Vec<u8>, kind: u8, size: usize) {
    if size < 15 {
        out.push(((size as u8) << 4) | kind);
    } else {
        out.push(0xf0 | kind);
        varint(out, size as u64);
    }
}

/// Writes one compact-protocol struct, field by field, in ascending id order.
pub struct StructWriter {
    bytes: Vec<u8>,
    last_id: i16,
}

impl StructWriter {
    pub fn new() -> Self {
        Self {
            bytes: vec![],
            last_id: 0,
        }
    }

    fn header(&mut self, id: i16, kind: u8) {
        let delta = id - self.last_id;
        assert!((1..=15).contains(&delta), "fields must ascend by at most 15");
        self.bytes.push(((delta as u8) << 4) | kind);
        self.last_id = id;
    }

    pub fn bool_field(&mut self, id: i16, value: bool) {
        self.header(id, if value { 1 } else { 2 });
    }

    pub fn i32_field(&mut self, id: i16, value: i32) {
        self.header(id, 5);
        varint(&mut self.bytes, zigzag(value as i64));
    }

    pub fn i64_field(&mut self, id: i16, value: i64) {
        self.header(id, 6);
        varint(&mut self.bytes, zigzag(value));
    }

    pub fn binary_field(&mut self, id: i16, value: &[u8]) {
        self.header(id, 8);
        varint(&mut self.bytes, value.len() as u64);
        self.bytes.extend_from_slice(value);
    }

    pub fn i32_list_field(&mut self, id: i16, values: &[i32]) {
        self.header(id, 9);
        list_header(&mut self.bytes, 5, values.len());
        for value in values {
            varint(&mut self.bytes, zigzag(*value as i64));
        }
    }

    pub fn string_list_field(&mut self, id: i16, values: &[&str]) {
        self.header(id, 9);
        list_header(&mut self.bytes, 8, values.len());
        for value in values {
            varint(&mut self.bytes, value.len() as u64);
            self.bytes.extend_from_slice(value.as_bytes());
        }
    }

    pub fn struct_list_field(&mut self, id: i16, values: &[Vec<u8>]) {
        self.header(id, 9);
        list_header(&mut self.bytes, 12, values.len());
        for value in values {
            self.bytes.extend_from_slice(value);
        }
    }

    pub fn struct_field(&mut self, id: i16, value: &[u8]) {
        self.header(id, 12);
        self.bytes.extend_from_slice(value);
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.bytes.push(0);
        self.bytes
    }
}

/// Encodes a SchemaElement. `None` children marks a leaf.
pub fn schema_element(
    type_: Option<i32>,
    repetition: Option<i32>,
    name: &str,
    num_children: Option<i32>,
) -> Vec<u8> {
    let mut writer = StructWriter::new();
    if let Some(type_) = type_ {
        writer.i32_field(1, type_);
    }
    if let Some(repetition) = repetition {
        writer.i32_field(3, repetition);
    }
    writer.binary_field(4, name.as_bytes());
    if let Some(num_children) = num_children {
        writer.i32_field(5, num_children);
    }
    writer.finish()
}

/// Encodes a v1 data page header. Levels are declared RLE-encoded.
pub fn data_page_header(
    num_values: i32,
    encoding: i32,
    uncompressed_size: i32,
    compressed_size: i32,
) -> Vec<u8> {
    let mut inner = StructWriter::new();
    inner.i32_field(1, num_values);
    inner.i32_field(2, encoding);
    inner.i32_field(3, 3);
    inner.i32_field(4, 3);
    let inner = inner.finish();

    let mut writer = StructWriter::new();
    writer.i32_field(1, 0);
    writer.i32_field(2, uncompressed_size);
    writer.i32_field(3, compressed_size);
    writer.struct_field(5, &inner);
    writer.finish()
}

pub fn dict_page_header(
    num_values: i32,
    encoding: i32,
    uncompressed_size: i32,
    compressed_size: i32,
) -> Vec<u8> {
    let mut inner = StructWriter::new();
    inner.i32_field(1, num_values);
    inner.i32_field(2, encoding);
    let inner = inner.finish();

    let mut writer = StructWriter::new();
    writer.i32_field(1, 2);
    writer.i32_field(2, uncompressed_size);
    writer.i32_field(3, compressed_size);
    writer.struct_field(7, &inner);
    writer.finish()
}

/// Encodes a page header of an arbitrary type with no nested header, as
/// index pages have.
pub fn bare_page_header(type_: i32, size: i32) -> Vec<u8> {
    let mut writer = StructWriter::new();
    writer.i32_field(1, type_);
    writer.i32_field(2, size);
    writer.i32_field(3, size);
    writer.finish()
}

pub fn plain_i32(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn plain_i64(values: &[i64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn plain_f64(values: &[f64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn plain_byte_arrays(values: &[&[u8]]) -> Vec<u8> {
    let mut out = Vec::new();
    for value in values {
        out.extend_from_slice(&(value.len() as u32).to_le_bytes());
        out.extend_from_slice(value);
    }
    out
}

/// Encodes up to 8 one-bit levels as a length-prefixed bit-packed run, the
/// layout v1 data pages use for the definition and repetition levels of
/// columns one level deep.
pub fn levels(levels: &[u8]) -> Vec<u8> {
    assert!(levels.len() <= 8);
    let mut packed = 0u8;
    for (i, level) in levels.iter().enumerate() {
        assert!(*level <= 1);
        packed |= level << i;
    }
    let run = [0b00000011u8, packed];
    let mut out = (run.len() as u32).to_le_bytes().to_vec();
    out.extend_from_slice(&run);
    out
}

/// Encodes a dictionary-index stream: bit width byte plus one bit-packed
/// group of 8 indices (missing indices pad with zero).
pub fn dict_indices(bit_width: u8, indices: &[u32]) -> Vec<u8> {
    assert!(indices.len() <= 8 && bit_width <= 8);
    let mut out = vec![bit_width, 0b00000011];
    let mut bits = 0u64;
    for (i, index) in indices.iter().enumerate() {
        bits |= (*index as u64) << (i * bit_width as usize);
    }
    out.extend_from_slice(&bits.to_le_bytes()[..bit_width as usize]);
    out
}

/// A column chunk's footer entry.
pub struct Chunk {
    pub path: Vec<String>,
    pub type_: i32,
    pub codec: i32,
    pub num_values: i64,
    pub encodings: Vec<i32>,
    pub data_page_offset: i64,
    pub dict_page_offset: Option<i64>,
    pub total_compressed_size: i64,
    pub total_uncompressed_size: i64,
}

fn column_chunk_bytes(chunk: &Chunk) -> Vec<u8> {
    let mut metadata = StructWriter::new();
    metadata.i32_field(1, chunk.type_);
    metadata.i32_list_field(2, &chunk.encodings);
    let path: Vec<&str> = chunk.path.iter().map(|s| s.as_str()).collect();
    metadata.string_list_field(3, &path);
    metadata.i32_field(4, chunk.codec);
    metadata.i64_field(5, chunk.num_values);
    metadata.i64_field(6, chunk.total_uncompressed_size);
    metadata.i64_field(7, chunk.total_compressed_size);
    metadata.i64_field(9, chunk.data_page_offset);
    if let Some(offset) = chunk.dict_page_offset {
        metadata.i64_field(11, offset);
    }
    let metadata = metadata.finish();

    let mut writer = StructWriter::new();
    writer.i64_field(2, chunk.data_page_offset);
    writer.struct_field(3, &metadata);
    writer.finish()
}

/// Accumulates page bytes and footer entries, then closes the file.
pub struct FileBuilder {
    bytes: Vec<u8>,
    row_groups: Vec<(i64, Vec<Chunk>)>,
}

impl FileBuilder {
    pub fn new() -> Self {
        Self {
            bytes: b"PAR1".to_vec(),
            row_groups: vec![],
        }
    }

    /// The offset the next pushed byte will land at.
    pub fn offset(&self) -> i64 {
        self.bytes.len() as i64
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    pub fn begin_row_group(&mut self, num_rows: i64) {
        self.row_groups.push((num_rows, vec![]));
    }

    pub fn add_chunk(&mut self, chunk: Chunk) {
        self.row_groups
            .last_mut()
            .expect("begin_row_group first")
            .1
            .push(chunk);
    }

    pub fn finish(self, schema: &[Vec<u8>], created_by: Option<&str>) -> Vec<u8> {
        self.finish_with_key_values(schema, created_by, &[])
    }

    pub fn finish_with_key_values(
        mut self,
        schema: &[Vec<u8>],
        created_by: Option<&str>,
        key_values: &[(&str, &str)],
    ) -> Vec<u8> {
        let num_rows: i64 = self.row_groups.iter().map(|(rows, _)| rows).sum();
        let row_groups: Vec<Vec<u8>> = self
            .row_groups
            .iter()
            .map(|(rows, chunks)| {
                let chunks_bytes: Vec<Vec<u8>> = chunks.iter().map(column_chunk_bytes).collect();
                let total: i64 = chunks.iter().map(|c| c.total_compressed_size).sum();
                let mut writer = StructWriter::new();
                writer.struct_list_field(1, &chunks_bytes);
                writer.i64_field(2, total);
                writer.i64_field(3, *rows);
                writer.finish()
            })
            .collect();

        let mut metadata = StructWriter::new();
        metadata.i32_field(1, 1);
        metadata.struct_list_field(2, schema);
        metadata.i64_field(3, num_rows);
        metadata.struct_list_field(4, &row_groups);
        if !key_values.is_empty() {
            let pairs: Vec<Vec<u8>> = key_values
                .iter()
                .map(|(key, value)| {
                    let mut writer = StructWriter::new();
                    writer.binary_field(1, key.as_bytes());
                    writer.binary_field(2, value.as_bytes());
                    writer.finish()
                })
                .collect();
            metadata.struct_list_field(5, &pairs);
        }
        if let Some(created_by) = created_by {
            metadata.binary_field(6, created_by.as_bytes());
        }
        let metadata = metadata.finish();

        self.bytes.extend_from_slice(&metadata);
        self.bytes
            .extend_from_slice(&(metadata.len() as u32).to_le_bytes());
        self.bytes.extend_from_slice(b"PAR1");
        self.bytes
    }
}

/// A file with one required INT32 column named "id" holding `values`, one
/// data page per row group.
pub fn i32_file(groups: &[&[i32]]) -> Vec<u8> {
    let mut file = FileBuilder::new();
    for values in groups {
        file.begin_row_group(values.len() as i64);
        let offset = file.offset();
        let payload = plain_i32(values);
        let header = data_page_header(values.len() as i32, 0, payload.len() as i32, payload.len() as i32);
        file.push(&header);
        file.push(&payload);
        file.add_chunk(Chunk {
            path: vec!["id".to_string()],
            type_: 1,
            codec: 0,
            num_values: values.len() as i64,
            encodings: vec![0, 3],
            data_page_offset: offset,
            dict_page_offset: None,
            total_compressed_size: (header.len() + payload.len()) as i64,
            total_uncompressed_size: (header.len() + payload.len()) as i64,
        });
    }
    let schema = vec![
        schema_element(None, None, "schema", Some(1)),
        schema_element(Some(1), Some(0), "id", None),
    ];
    file.finish(&schema, Some("parquet-lite tests"))
}
