//! TwiML voice response builder
//!
//! Renders the subset of Twilio's voice markup the webhook uses:
//! `<Say>`, `<Gather>` (speech input, optionally wrapping a `<Say>`) and
//! `<Redirect>`.

use axum::http::header;
use axum::response::{IntoResponse, Response};
use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{ApiError, Result};

/// Speech `<Gather>` that posts what it heard to `action`
#[derive(Debug, Clone, PartialEq)]
pub struct Gather {
    pub action: String,
    pub method: String,
    pub language: String,
    pub timeout_secs: u32,
    pub say: Option<String>,
}

impl Gather {
    pub fn speech(action: impl Into<String>, language: impl Into<String>, timeout_secs: u32) -> Self {
        Self {
            action: action.into(),
            method: "POST".to_string(),
            language: language.into(),
            timeout_secs,
            say: None,
        }
    }

    /// Speak `text` while listening
    pub fn say(mut self, text: impl Into<String>) -> Self {
        self.say = Some(text.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Verb {
    Say(String),
    Gather(Gather),
    Redirect { url: String, method: String },
}

/// A `<Response>` document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoiceResponse {
    verbs: Vec<Verb>,
}

impl VoiceResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn say(mut self, text: impl Into<String>) -> Self {
        self.verbs.push(Verb::Say(text.into()));
        self
    }

    pub fn gather(mut self, gather: Gather) -> Self {
        self.verbs.push(Verb::Gather(gather));
        self
    }

    /// Redirect the call with a POST to `url`
    pub fn redirect(mut self, url: impl Into<String>) -> Self {
        self.verbs.push(Verb::Redirect {
            url: url.into(),
            method: "POST".to_string(),
        });
        self
    }

    /// Render as an XML document
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());

        write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        write(&mut writer, Event::Start(BytesStart::new("Response")))?;
        for verb in &self.verbs {
            match verb {
                Verb::Say(text) => write_say(&mut writer, text)?,
                Verb::Gather(gather) => write_gather(&mut writer, gather)?,
                Verb::Redirect { url, method } => {
                    let mut start = BytesStart::new("Redirect");
                    start.push_attribute(("method", method.as_str()));
                    write(&mut writer, Event::Start(start))?;
                    write(&mut writer, Event::Text(text_node(url)))?;
                    write(&mut writer, Event::End(BytesEnd::new("Redirect")))?;
                }
            }
        }
        write(&mut writer, Event::End(BytesEnd::new("Response")))?;

        String::from_utf8(writer.into_inner()).map_err(|e| ApiError::Twiml(e.to_string()))
    }
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| ApiError::Twiml(e.to_string()))
}

/// Text content with only `&`, `<` and `>` escaped
fn text_node(text: &str) -> BytesText<'_> {
    BytesText::from_escaped(partial_escape(text))
}

fn write_say(writer: &mut Writer<Vec<u8>>, text: &str) -> Result<()> {
    write(writer, Event::Start(BytesStart::new("Say")))?;
    write(writer, Event::Text(text_node(text)))?;
    write(writer, Event::End(BytesEnd::new("Say")))
}

fn write_gather(writer: &mut Writer<Vec<u8>>, gather: &Gather) -> Result<()> {
    let timeout = gather.timeout_secs.to_string();
    let mut start = BytesStart::new("Gather");
    start.push_attribute(("action", gather.action.as_str()));
    start.push_attribute(("input", "speech"));
    start.push_attribute(("language", gather.language.as_str()));
    start.push_attribute(("method", gather.method.as_str()));
    start.push_attribute(("speechTimeout", "auto"));
    start.push_attribute(("timeout", timeout.as_str()));

    match &gather.say {
        Some(text) => {
            write(writer, Event::Start(start))?;
            write_say(writer, text)?;
            write(writer, Event::End(BytesEnd::new("Gather")))
        }
        None => write(writer, Event::Empty(start)),
    }
}

impl IntoResponse for VoiceResponse {
    fn into_response(self) -> Response {
        match self.to_xml() {
            Ok(xml) => ([(header::CONTENT_TYPE, "application/xml")], xml).into_response(),
            Err(e) => e.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DECL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

    #[test]
    fn test_say_then_redirect() {
        let xml = VoiceResponse::new()
            .say("Got it.")
            .redirect("/process_agent?UserText=my+bill&From=%2B15550001")
            .to_xml()
            .unwrap();

        assert_eq!(
            xml,
            format!(
                "{}<Response><Say>Got it.</Say><Redirect method=\"POST\">/process_agent?UserText=my+bill&amp;From=%2B15550001</Redirect></Response>",
                DECL
            )
        );
    }

    #[test]
    fn test_empty_gather() {
        let xml = VoiceResponse::new()
            .say("Hello.")
            .gather(Gather::speech("/voice", "en-IN", 4))
            .to_xml()
            .unwrap();

        assert_eq!(
            xml,
            format!(
                "{}<Response><Say>Hello.</Say><Gather action=\"/voice\" input=\"speech\" language=\"en-IN\" method=\"POST\" speechTimeout=\"auto\" timeout=\"4\"/></Response>",
                DECL
            )
        );
    }

    #[test]
    fn test_gather_wraps_say_and_escapes() {
        let xml = VoiceResponse::new()
            .gather(Gather::speech("/voice", "en-IN", 4).say("Don't say <fish> & chips"))
            .to_xml()
            .unwrap();

        assert!(xml.contains(
            "timeout=\"4\"><Say>Don't say &lt;fish&gt; &amp; chips</Say></Gather>"
        ));
    }
}
