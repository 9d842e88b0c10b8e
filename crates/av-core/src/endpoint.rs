//! Endpoint templating
//!
//! Command endpoints are path templates. The literal `:address` token is
//! replaced by the device's network address; every other `:`-prefixed
//! placeholder is filled positionally by a caller-supplied parameter, which
//! replaces the path segment from the colon to the next `/`.

use thiserror::Error;

/// Token replaced by the device's network address
pub const ADDRESS_TOKEN: &str = ":address";

/// Errors that can occur while building an endpoint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    #[error("not enough parameter locations in endpoint {template}: expected {expected}, found {available}")]
    ParameterCount {
        template: String,
        expected: usize,
        available: usize,
    },
}

enum Segment<'a> {
    /// Untouched template text, possibly holding a placeholder
    Template(&'a str),
    /// Text already substituted; never scanned for placeholders again
    Filled(String),
}

/// Build a concrete endpoint from a template, address and parameters
///
/// Placeholders left over after all parameters are consumed stay in the
/// endpoint verbatim. Supplying more parameters than there are placeholders
/// is an error.
pub fn build_endpoint(
    template: &str,
    address: &str,
    parameters: &[String],
) -> Result<String, EndpointError> {
    let mut segments: Vec<Segment<'_>> = template
        .split('/')
        .map(|s| {
            if s.contains(ADDRESS_TOKEN) {
                Segment::Filled(s.replace(ADDRESS_TOKEN, address))
            } else {
                Segment::Template(s)
            }
        })
        .collect();

    for (filled, parameter) in parameters.iter().enumerate() {
        let next = segments.iter().enumerate().find_map(|(i, seg)| match seg {
            Segment::Template(s) => s.find(':').map(|colon| (i, colon)),
            Segment::Filled(_) => None,
        });

        let Some((index, colon)) = next else {
            return Err(EndpointError::ParameterCount {
                template: template.to_string(),
                expected: parameters.len(),
                available: filled,
            });
        };

        if let Segment::Template(s) = segments[index] {
            segments[index] = Segment::Filled(format!("{}{}", &s[..colon], parameter));
        }
    }

    let parts: Vec<&str> = segments
        .iter()
        .map(|seg| match seg {
            Segment::Template(s) => *s,
            Segment::Filled(s) => s.as_str(),
        })
        .collect();

    Ok(parts.join("/"))
}
