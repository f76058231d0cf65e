//! XML parsing for storage service responses.
//!
//! Two documents are understood: the `<Error>` document sent with failed
//! requests and the `<ListBucketResult>` document sent for bucket listings.
//! Elements are matched by local name, so namespaced documents decode the same
//! way. Elements with no text content are treated as absent.

use crate::error::{ProviderError, ResponseError, S3Error};
use crate::response::strip_quotes;
use crate::types::{ListBucketOutput, ObjectEntry, Owner};
use quick_xml::events::Event;
use quick_xml::Reader;

const ERROR_ROOT: &str = "Error";
const LIST_ROOT: &str = "ListBucketResult";

fn xml_error(e: impl std::fmt::Display) -> S3Error {
    S3Error::Response(ResponseError::XmlParse {
        message: e.to_string(),
    })
}

fn unexpected_root(expected: &'static str, actual: &str) -> S3Error {
    S3Error::Response(ResponseError::UnexpectedRoot {
        expected,
        actual: actual.to_string(),
    })
}

fn set_once(field: &mut Option<String>, text: &str) {
    if field.is_none() && !text.is_empty() {
        *field = Some(text.to_string());
    }
}

enum Node<'a> {
    Open(&'a [String]),
    Close(&'a [String], &'a str),
}

/// Walks a document, reporting every opening tag and every closing tag with
/// the text it enclosed. Each node carries the path of element names from the
/// root down to the current element.
fn walk<F>(xml: &str, expected_root: &'static str, mut visit: F) -> Result<(), S3Error>
where
    F: FnMut(Node<'_>),
{
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut seen_root = false;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if !seen_root {
                    if name != expected_root {
                        return Err(unexpected_root(expected_root, &name));
                    }
                    seen_root = true;
                }
                path.push(name);
                text.clear();
                visit(Node::Open(&path));
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if !seen_root {
                    if name != expected_root {
                        return Err(unexpected_root(expected_root, &name));
                    }
                    seen_root = true;
                }
                path.push(name);
                visit(Node::Open(&path));
                visit(Node::Close(&path, ""));
                path.pop();
            }
            Event::Text(e) => {
                text.push_str(&e.unescape().map_err(xml_error)?);
            }
            Event::CData(e) => {
                text.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Event::End(_) => {
                visit(Node::Close(&path, &text));
                text.clear();
                path.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(unexpected_root(expected_root, ""));
    }

    Ok(())
}

/// Parse an `<Error>` document.
pub fn parse_error_document(xml: &str) -> Result<ProviderError, S3Error> {
    let mut error = ProviderError::default();

    walk(xml, ERROR_ROOT, |node| {
        let Node::Close([_, name], text) = node else {
            return;
        };
        let field = match name.as_str() {
            "Code" => &mut error.code,
            "Message" => &mut error.message,
            "RequestId" => &mut error.request_id,
            "HostId" => &mut error.host_id,
            "Resource" => &mut error.resource,
            "ArgumentName" => &mut error.argument_name,
            "ArgumentValue" => &mut error.argument_value,
            "AWSAccessKeyId" => &mut error.aws_access_key_id,
            "SignatureProvided" => &mut error.signature_provided,
            "StringToSign" => &mut error.string_to_sign,
            "StringToSignBytes" => &mut error.string_to_sign_bytes,
            _ => return,
        };
        set_once(field, text);
    })?;

    Ok(error)
}

/// Parse a `<ListBucketResult>` document.
pub fn parse_list_bucket_result(xml: &str) -> Result<ListBucketOutput, S3Error> {
    let mut output = ListBucketOutput::default();
    let mut is_truncated: Option<String> = None;
    let mut max_keys: Option<String> = None;

    walk(xml, LIST_ROOT, |node| match node {
        Node::Open([_, contents]) if contents == "Contents" => {
            output.contents.push(ObjectEntry::default());
        }
        Node::Open([_, contents, owner]) if contents == "Contents" && owner == "Owner" => {
            if let Some(entry) = output.contents.last_mut() {
                entry.owner.get_or_insert_with(Owner::default);
            }
        }
        Node::Close([_, field], text) => match field.as_str() {
            "Name" => set_once(&mut output.name, text),
            "Prefix" => set_once(&mut output.prefix, text),
            "Marker" => set_once(&mut output.marker, text),
            "NextMarker" => set_once(&mut output.next_marker, text),
            "Delimiter" => set_once(&mut output.delimiter, text),
            "MaxKeys" => set_once(&mut max_keys, text),
            "IsTruncated" => set_once(&mut is_truncated, text),
            _ => {}
        },
        Node::Close([_, group, field], text) if group == "CommonPrefixes" && field == "Prefix" => {
            if !text.is_empty() {
                output.common_prefixes.push(text.to_string());
            }
        }
        Node::Close([_, contents, field], text) if contents == "Contents" => {
            let Some(entry) = output.contents.last_mut() else {
                return;
            };
            match field.as_str() {
                "Key" => set_once(&mut entry.key, text),
                "ETag" => {
                    if entry.e_tag.is_none() && !text.is_empty() {
                        entry.e_tag = Some(strip_quotes(text));
                    }
                }
                "LastModified" => set_once(&mut entry.last_modified, text),
                "Size" => {
                    if entry.size.is_none() {
                        entry.size = text.parse().ok();
                    }
                }
                "StorageClass" => set_once(&mut entry.storage_class, text),
                _ => {}
            }
        }
        Node::Close([_, contents, owner, field], text)
            if contents == "Contents" && owner == "Owner" =>
        {
            let Some(owner) = output.contents.last_mut().and_then(|e| e.owner.as_mut()) else {
                return;
            };
            match field.as_str() {
                "ID" => set_once(&mut owner.id, text),
                "DisplayName" => set_once(&mut owner.display_name, text),
                _ => {}
            }
        }
        _ => {}
    })?;

    output.is_truncated = is_truncated
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(false);
    output.max_keys = max_keys.and_then(|v| v.parse().ok());

    Ok(output)
}
