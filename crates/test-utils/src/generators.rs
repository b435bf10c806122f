//! Generators for synthetic OGC API documents.
//!
//! These produce JSON values shaped like real server responses so tests can
//! cover pyramid layouts the checked-in documents do not.

use serde_json::{json, Value};

/// (matrix_width, matrix_height) for `levels` levels of a quad-tree pyramid
/// whose first level is `root`.
///
/// # Example
///
/// ```
/// use test_utils::quad_pyramid;
///
/// assert_eq!(quad_pyramid((2, 1), 3), vec![(2, 1), (4, 2), (8, 4)]);
/// ```
pub fn quad_pyramid(root: (u64, u64), levels: u32) -> Vec<(u64, u64)> {
    (0..levels)
        .map(|z| (root.0 << z, root.1 << z))
        .collect()
}

/// A tile matrix set (2.0 encoding) with one matrix per entry of
/// `dimensions`. Level ids start at `first_id`.
pub fn tile_matrix_set_json(
    id: &str,
    crs_uri: &str,
    dimensions: &[(u64, u64)],
    first_id: u32,
    corner_of_origin: &str,
) -> Value {
    let matrices: Vec<Value> = dimensions
        .iter()
        .enumerate()
        .map(|(i, (width, height))| {
            json!({
                "id": (first_id + i as u32).to_string(),
                "cornerOfOrigin": corner_of_origin,
                "pointOfOrigin": [-180.0, 90.0],
                "tileWidth": 256,
                "tileHeight": 256,
                "matrixWidth": width,
                "matrixHeight": height
            })
        })
        .collect();

    json!({
        "id": id,
        "crs": crs_uri,
        "tileMatrices": matrices
    })
}

/// A collection with the given `(rel, href, type)` links.
pub fn collection_json(id: &str, links: &[(&str, &str, &str)]) -> Value {
    let links: Vec<Value> = links
        .iter()
        .map(|(rel, href, media_type)| json!({ "rel": rel, "href": href, "type": media_type }))
        .collect();
    json!({ "id": id, "links": links })
}

/// A collection list wrapping `collections`.
pub fn collection_list_json(collections: Vec<Value>) -> Value {
    json!({ "links": [], "collections": collections })
}
