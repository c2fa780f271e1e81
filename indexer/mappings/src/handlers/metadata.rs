use error_stack::Result;
use serde_json::{Map, Value};
use stkr_indexer_core::{EntityStore, EventPosition};
use tracing::debug;

use crate::{entities::StickerMetadata, error::MappingError, reader::ContractStateReader};

use super::HandlerContext;

/// Handle a sticker metadata document fetched from `cid`.
///
/// Documents that are not valid json or that miss any required field are skipped without
/// writing anything. Returns whether an entity was written.
pub fn handle_sticker_metadata<S, R>(
    ctx: &mut HandlerContext<'_, S, R>,
    cid: &str,
    content: &[u8],
) -> Result<bool, MappingError>
where
    S: EntityStore,
    R: ContractStateReader,
{
    let Some(metadata) = decode_sticker_metadata(cid, content) else {
        return Ok(false);
    };

    // File data sources are not tied to a log.
    ctx.save(EventPosition::default(), &metadata)?;

    Ok(true)
}

/// Decode a sticker metadata document.
///
/// All of `imageCID`, `filename`, `contentType`, `aspectRatio` and `size` must be present and
/// non-null. The two numeric fields accept json integers or decimal strings.
pub fn decode_sticker_metadata(cid: &str, content: &[u8]) -> Option<StickerMetadata> {
    let value: Value = match serde_json::from_slice(content) {
        Ok(value) => value,
        Err(err) => {
            debug!(cid, err = %err, "sticker metadata is not valid json");
            return None;
        }
    };

    let Some(object) = value.as_object() else {
        debug!(cid, "sticker metadata is not an object");
        return None;
    };

    let metadata = StickerMetadata {
        id: cid.to_string(),
        image_cid: string_field(object, "imageCID")?,
        filename: string_field(object, "filename")?,
        content_type: string_field(object, "contentType")?,
        aspect_ratio: integer_field(object, "aspectRatio")?,
        size: integer_field(object, "size")?,
    };

    Some(metadata)
}

fn required<'a>(object: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    match object.get(field) {
        None | Some(Value::Null) => {
            debug!(field, "sticker metadata field missing");
            None
        }
        Some(value) => Some(value),
    }
}

fn string_field(object: &Map<String, Value>, field: &str) -> Option<String> {
    let value = required(object, field)?;
    match value {
        Value::String(s) => Some(s.clone()),
        _ => {
            debug!(field, "sticker metadata field is not a string");
            None
        }
    }
}

fn integer_field(object: &Map<String, Value>, field: &str) -> Option<u64> {
    let value = required(object, field)?;
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };

    if parsed.is_none() {
        debug!(field, "sticker metadata field is not an integer");
    }

    parsed
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use stkr_indexer_core::{EntityStore, EntityStoreExt, MemoryEntityStore};

    use crate::{
        entities::StickerMetadata, handlers::HandlerContext, reader::MockContractStateReader,
    };

    use super::{decode_sticker_metadata, handle_sticker_metadata};

    const CID: &str = "bafkreidmetadata";

    fn full_document() -> Value {
        json!({
            "imageCID": "bafkreidimage",
            "filename": "sticker.png",
            "contentType": "image/png",
            "aspectRatio": 1,
            "size": "20480",
        })
    }

    fn handle(document: &Value) -> (MemoryEntityStore, bool) {
        let mut store = MemoryEntityStore::new();
        let reader = MockContractStateReader::new();
        let mut data_sources = Vec::new();
        let content = serde_json::to_vec(document).unwrap();

        let written = {
            let mut ctx = HandlerContext::new(&mut store, &reader, &mut data_sources);
            handle_sticker_metadata(&mut ctx, CID, &content).unwrap()
        };

        (store, written)
    }

    #[test]
    fn test_full_document() {
        let (mut store, written) = handle(&full_document());
        assert!(written);
        assert_eq!(store.count("StickerMetadata").unwrap(), 1);

        let metadata: StickerMetadata = store.load(CID).unwrap().unwrap();
        assert_eq!(metadata.image_cid, "bafkreidimage");
        assert_eq!(metadata.filename, "sticker.png");
        assert_eq!(metadata.content_type, "image/png");
        assert_eq!(metadata.aspect_ratio, 1);
        assert_eq!(metadata.size, 20480);
    }

    #[test]
    fn test_missing_any_field_writes_nothing() {
        for field in ["imageCID", "filename", "contentType", "aspectRatio", "size"] {
            let mut document = full_document();
            document.as_object_mut().unwrap().remove(field);

            let (mut store, written) = handle(&document);
            assert!(!written, "document without {field} was written");
            assert_eq!(store.count("StickerMetadata").unwrap(), 0);
        }
    }

    #[test]
    fn test_null_field_writes_nothing() {
        let mut document = full_document();
        document["filename"] = Value::Null;

        let (mut store, written) = handle(&document);
        assert!(!written);
        assert_eq!(store.count("StickerMetadata").unwrap(), 0);
    }

    #[test]
    fn test_invalid_documents() {
        assert!(decode_sticker_metadata(CID, b"not json").is_none());
        assert!(decode_sticker_metadata(CID, b"[1, 2]").is_none());

        let mut document = full_document();
        document["size"] = json!("large");
        let content = serde_json::to_vec(&document).unwrap();
        assert!(decode_sticker_metadata(CID, &content).is_none());
    }
}
