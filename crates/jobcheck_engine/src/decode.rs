use encoding_rs::{Encoding, UTF_8};
use jobcheck_logging::jc_debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBody {
    pub text: String,
    pub encoding_label: String,
}

/// Decode a response body into UTF-8 using: BOM -> Content-Type charset -> UTF-8.
/// Malformed sequences become U+FFFD rather than failing the request.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> DecodedBody {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| {
            content_type
                .and_then(extract_charset)
                .and_then(|label| Encoding::for_label(label.as_bytes()))
        })
        .unwrap_or(UTF_8);

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        jc_debug!("Body contained invalid {} sequences", used.name());
    }
    DecodedBody {
        text: text.into_owned(),
        encoding_label: used.name().to_string(),
    }
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|part| {
        let (key, value) = part.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(['"', '\''].as_ref()).to_string())
    })
}
