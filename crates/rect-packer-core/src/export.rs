use crate::atlas::{Atlas, Region};
use serde_json::{Value, json};

fn region_fields(r: &Region) -> (Value, Value) {
    let frame = json!({"x": r.frame.x, "y": r.frame.y, "w": r.frame.w, "h": r.frame.h});
    let (sw, sh) = r.source_size();
    (frame, json!({"w": sw, "h": sh}))
}

/// Serialize the atlas as `{ name, width, height, regions: [...], meta }`.
/// Regions keep packing order.
pub fn to_json_array(atlas: &Atlas) -> Value {
    let regions: Vec<Value> = atlas
        .regions
        .iter()
        .map(|r| {
            let (frame, source_size) = region_fields(r);
            json!({
                "name": r.name,
                "frame": frame,
                "rotated": r.rotated,
                "sourceSize": source_size,
            })
        })
        .collect();
    json!({
        "name": atlas.name,
        "width": atlas.width,
        "height": atlas.height,
        "regions": regions,
        "meta": &atlas.meta,
    })
}

/// Regions keyed by name, TexturePacker-style:
/// `{ frames: { name: { frame, rotated, sourceSize, uv } }, meta }`.
pub fn to_json_hash(atlas: &Atlas) -> Value {
    let mut frames = serde_json::Map::new();
    for r in &atlas.regions {
        let (frame, source_size) = region_fields(r);
        let (u0, v0, u1, v1) = r.uv(atlas.width, atlas.height);
        frames.insert(
            r.name.clone(),
            json!({
                "frame": frame,
                "rotated": r.rotated,
                "sourceSize": source_size,
                "uv": {"u0": u0, "v0": v0, "u1": u1, "v1": v1},
            }),
        );
    }
    json!({
        "frames": frames,
        "meta": &atlas.meta,
        "size": {"w": atlas.width, "h": atlas.height},
    })
}
