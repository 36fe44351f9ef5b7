//! Encoding a writable container's arena into a complete file image.
//!
//! Layout: superblock, then every object header in arena order (the root is
//! index 0), then the stored bytes of every dataset.

use std::collections::HashMap;
use std::rc::Rc;

use h5tree_format::superblock::{Superblock, SUPERBLOCK_SIZE};

use crate::error::Result;
use crate::record::ObjectRecord;

/// Encode `records` (arena order) and their stored dataset bytes.
pub(crate) fn encode_image(
    records: &[Rc<ObjectRecord>],
    raw: &HashMap<usize, Vec<u8>>,
) -> Result<Vec<u8>> {
    // header sizes do not depend on the address values
    let mut header_addr = Vec::with_capacity(records.len());
    let mut cursor = SUPERBLOCK_SIZE as u64;
    for rec in records {
        header_addr.push(cursor);
        cursor += rec.to_header(|t| t, 0)?.encoded_len() as u64;
    }

    let mut raw_addr = vec![0u64; records.len()];
    for (idx, addr) in raw_addr.iter_mut().enumerate() {
        if let Some(bytes) = raw.get(&idx) {
            *addr = cursor;
            cursor += bytes.len() as u64;
        }
    }

    let sb = Superblock::new(SUPERBLOCK_SIZE as u64, cursor, records.len() as u64);
    let mut image = Vec::with_capacity(cursor as usize);
    image.extend_from_slice(&sb.serialize());
    for (idx, rec) in records.iter().enumerate() {
        let hdr = rec.to_header(
            |target| header_addr.get(target as usize).copied().unwrap_or(0),
            raw_addr[idx],
        )?;
        image.extend_from_slice(&hdr.serialize()?);
    }
    for idx in 0..records.len() {
        if let Some(bytes) = raw.get(&idx) {
            image.extend_from_slice(bytes);
        }
    }
    debug_assert_eq!(image.len() as u64, cursor);
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{DatasetRecord, LinkEntry};
    use h5tree_format::data_layout::DataLayout;
    use h5tree_format::dataspace::Dataspace;
    use h5tree_format::datatype::Datatype;
    use h5tree_format::filter_pipeline::FilterPipeline;
    use h5tree_format::object_header::{ObjectHeader, ObjectKind};

    #[test]
    fn empty_container_image() {
        let image = encode_image(&[Rc::new(ObjectRecord::new_group())], &HashMap::new()).unwrap();
        let sb = Superblock::parse(&image).unwrap();
        assert_eq!(sb.root_address, SUPERBLOCK_SIZE as u64);
        assert_eq!(sb.eof_address, image.len() as u64);
        assert_eq!(sb.object_count, 1);
        let root = ObjectHeader::parse(&image, sb.root_address as usize).unwrap();
        assert_eq!(root.kind, ObjectKind::Group);
    }

    #[test]
    fn links_and_raw_data_resolve() {
        let mut root = ObjectRecord::new_group();
        root.insert_link(LinkEntry {
            name: "values".into(),
            kind: ObjectKind::Dataset,
            target: 1,
        });
        let ds = ObjectRecord::new_dataset(DatasetRecord {
            datatype: Datatype::U8,
            dataspace: Dataspace::simple(&[3]),
            pipeline: FilterPipeline::default(),
            layout: DataLayout::contiguous(0, 3),
        });
        let mut raw = HashMap::new();
        raw.insert(1usize, vec![7u8, 8, 9]);
        let image = encode_image(&[Rc::new(root), Rc::new(ds)], &raw).unwrap();

        let sb = Superblock::parse(&image).unwrap();
        let root = ObjectRecord::from_header(
            &ObjectHeader::parse(&image, sb.root_address as usize).unwrap(),
        )
        .unwrap();
        let child_addr = root.links[0].target as usize;
        let child = ObjectRecord::from_header(&ObjectHeader::parse(&image, child_addr).unwrap())
            .unwrap();
        let layout = child.dataset.unwrap().layout;
        assert_eq!(layout.slice(&image).unwrap(), &[7, 8, 9]);
    }
}
