use crate::atlas::Atlas;
use std::fmt::Write;

const HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
"#;

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn xml_bool(v: bool) -> &'static str {
    if v { "true" } else { "false" }
}

/// Build an Apple plist (XML) with regions in a `frames` dict keyed by name.
/// `texture_file` is written to `meta.textureFileName` when given.
pub fn to_plist_hash(atlas: &Atlas, texture_file: Option<&str>) -> String {
    let mut s = String::from(HEADER);
    s.push_str("  <key>frames</key>\n  <dict>\n");
    for r in &atlas.regions {
        let (sw, sh) = r.source_size();
        // writing into a String cannot fail
        let _ = write!(
            s,
            "    <key>{}</key>\n    <dict>\n      <key>frame</key><string>{{{{{},{}}},{{{},{}}}}}</string>\n      <key>rotated</key><{} />\n      <key>sourceSize</key><string>{{{}, {}}}</string>\n    </dict>\n",
            xml_escape(&r.name),
            r.frame.x,
            r.frame.y,
            r.frame.w,
            r.frame.h,
            xml_bool(r.rotated),
            sw,
            sh,
        );
    }
    s.push_str("  </dict>\n  <key>meta</key>\n  <dict>\n");
    let m = &atlas.meta;
    let _ = write!(
        s,
        "    <key>app</key><string>{}</string>\n    <key>version</key><string>{}</string>\n    <key>format</key><string>{}</string>\n    <key>method</key><string>{}</string>\n    <key>allowRotation</key><{} />\n    <key>powerOfTwo</key><{} />\n    <key>size</key><string>{{{}, {}}}</string>\n",
        xml_escape(&m.app),
        xml_escape(&m.version),
        xml_escape(&m.format),
        xml_escape(&m.method),
        xml_bool(m.allow_rotation),
        xml_bool(m.power_of_two),
        atlas.width,
        atlas.height,
    );
    if let Some(file) = texture_file {
        let _ = write!(
            s,
            "    <key>textureFileName</key><string>{0}</string>\n    <key>realTextureFileName</key><string>{0}</string>\n",
            xml_escape(file)
        );
    }
    s.push_str("  </dict>\n</dict>\n</plist>\n");
    s
}
