//! Response parsing for the login, submit and status endpoints.

use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::sync::LazyLock;

use crate::models::JobStatus;

/// `isDone` key as rendered in a job's Atom entry: `<s:key name="isDone">1</s:key>`
static IS_DONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"isDone">(0|1)"#).expect("valid isDone pattern"));

/// Why a response could not be turned into a value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Malformed XML: {0}")]
    Malformed(String),

    #[error("No <{0}> element in response")]
    Missing(String),

    #[error("Conflicting values for <{0}> in response")]
    Conflicting(String),

    #[error("No isDone flag in response")]
    NoDoneFlag,
}

/// Extract the text of the single element named `tag`.
///
/// Namespace prefixes are ignored. Empty elements do not count. Several
/// occurrences are accepted only if they all carry the same text.
pub fn unique_element_text(body: &[u8], tag: &str) -> Result<String, ParseError> {
    let mut reader = Reader::from_reader(body);
    reader.config_mut().trim_text(true);

    let mut values: Vec<String> = Vec::new();
    let mut depth_in_tag = 0usize;
    let mut current = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if depth_in_tag > 0 {
                    depth_in_tag += 1;
                } else if e.local_name().as_ref() == tag.as_bytes() {
                    depth_in_tag = 1;
                    current.clear();
                }
            }
            Ok(Event::End(_)) if depth_in_tag > 0 => {
                depth_in_tag -= 1;
                if depth_in_tag == 0 && !current.is_empty() {
                    values.push(std::mem::take(&mut current));
                }
            }
            Ok(Event::Text(t)) if depth_in_tag > 0 => {
                let text = t
                    .unescape()
                    .map_err(|e| ParseError::Malformed(e.to_string()))?;
                current.push_str(&text);
            }
            Ok(Event::CData(c)) if depth_in_tag > 0 => {
                current.push_str(&String::from_utf8_lossy(&c.into_inner()));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ParseError::Malformed(format!(
                    "at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        }
        buf.clear();
    }

    let first = values
        .first()
        .cloned()
        .ok_or_else(|| ParseError::Missing(tag.to_string()))?;

    if values.iter().any(|v| *v != first) {
        return Err(ParseError::Conflicting(tag.to_string()));
    }

    Ok(first)
}

/// Read the done flag from a job status response.
///
/// The flag is matched as text (`0` or `1`) and mapped straight into
/// [`JobStatus`].
pub fn done_flag(body: &[u8]) -> Result<JobStatus, ParseError> {
    let text = String::from_utf8_lossy(body);
    let flag = IS_DONE
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .ok_or(ParseError::NoDoneFlag)?;

    match flag.as_str() {
        "1" => Ok(JobStatus::Done),
        _ => Ok(JobStatus::NotDone),
    }
}
