//! Voice Response - TwiML document builder
//!
//! Builds the XML dialect the telephony provider executes: `<Say>`,
//! `<Gather>`, `<Redirect>` and `<Hangup>` inside a single `<Response>`.

/// A `<Say>` verb
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Say {
    pub voice: String,
    pub text: String,
}

impl Say {
    pub fn new(voice: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            voice: voice.into(),
            text: text.into(),
        }
    }
}

/// A speech `<Gather>` posting the recognised text to `action`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gather {
    pub action: String,
    pub method: String,
    pub speech_timeout: String,
    pub speech_model: String,
    pub enhanced: bool,
    /// Prompt spoken while listening
    pub prompt: Option<Say>,
}

impl Gather {
    pub fn speech(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            method: "POST".to_string(),
            speech_timeout: "auto".to_string(),
            speech_model: "phone_call".to_string(),
            enhanced: true,
            prompt: None,
        }
    }

    pub fn with_prompt(mut self, prompt: Say) -> Self {
        self.prompt = Some(prompt);
        self
    }

    pub fn with_speech_model(mut self, model: impl Into<String>) -> Self {
        self.speech_model = model.into();
        self
    }

    pub fn with_speech_timeout(mut self, timeout: impl Into<String>) -> Self {
        self.speech_timeout = timeout.into();
        self
    }
}

/// Top-level verbs of a response, in execution order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verb {
    Say(Say),
    Gather(Gather),
    Redirect { url: String, method: String },
    Hangup,
}

/// A complete `<Response>` document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceResponse {
    verbs: Vec<Verb>,
}

impl VoiceResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn say(mut self, say: Say) -> Self {
        self.verbs.push(Verb::Say(say));
        self
    }

    pub fn gather(mut self, gather: Gather) -> Self {
        self.verbs.push(Verb::Gather(gather));
        self
    }

    pub fn redirect(mut self, url: impl Into<String>) -> Self {
        self.verbs.push(Verb::Redirect {
            url: url.into(),
            method: "POST".to_string(),
        });
        self
    }

    pub fn hangup(mut self) -> Self {
        self.verbs.push(Verb::Hangup);
        self
    }

    pub fn verbs(&self) -> &[Verb] {
        &self.verbs
    }

    pub fn ends_call(&self) -> bool {
        matches!(self.verbs.last(), Some(Verb::Hangup))
    }

    /// Serialize to the XML document returned to the provider
    pub fn to_xml(&self) -> String {
        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?><Response>"#);

        for verb in &self.verbs {
            match verb {
                Verb::Say(say) => write_say(&mut xml, say),
                Verb::Gather(gather) => {
                    xml.push_str(&format!(
                        r#"<Gather input="speech" action="{}" method="{}" speechTimeout="{}" speechModel="{}" enhanced="{}">"#,
                        xml_escape(&gather.action),
                        xml_escape(&gather.method),
                        xml_escape(&gather.speech_timeout),
                        xml_escape(&gather.speech_model),
                        gather.enhanced,
                    ));
                    if let Some(prompt) = &gather.prompt {
                        write_say(&mut xml, prompt);
                    }
                    xml.push_str("</Gather>");
                }
                Verb::Redirect { url, method } => {
                    xml.push_str(&format!(
                        r#"<Redirect method="{}">{}</Redirect>"#,
                        xml_escape(method),
                        xml_escape(url)
                    ));
                }
                Verb::Hangup => xml.push_str("<Hangup/>"),
            }
        }

        xml.push_str("</Response>");
        xml
    }
}

impl std::fmt::Display for VoiceResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_xml())
    }
}

fn write_say(xml: &mut String, say: &Say) {
    xml.push_str(&format!(
        r#"<Say voice="{}">{}</Say>"#,
        xml_escape(&say.voice),
        xml_escape(&say.text)
    ));
}

/// Escape text for element content and attribute values
///
/// Characters XML 1.0 does not allow are dropped.
pub fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\t' | '\n' | '\r' => escaped.push(c),
            c if c.is_control() || c == '\u{FFFE}' || c == '\u{FFFF}' => {}
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_response() {
        assert_eq!(
            VoiceResponse::new().to_xml(),
            r#"<?xml version="1.0" encoding="UTF-8"?><Response></Response>"#
        );
    }

    #[test]
    fn test_say_and_hangup() {
        let xml = VoiceResponse::new()
            .say(Say::new("Polly.Amy-Neural", "Goodbye"))
            .hangup()
            .to_xml();

        assert!(xml.contains(r#"<Say voice="Polly.Amy-Neural">Goodbye</Say>"#));
        assert!(xml.ends_with("<Hangup/></Response>"));
    }

    #[test]
    fn test_gather_nests_prompt() {
        let xml = VoiceResponse::new()
            .gather(
                Gather::speech("https://example.test/next")
                    .with_prompt(Say::new("alice", "Go ahead")),
            )
            .to_xml();

        assert!(xml.contains(
            r#"<Gather input="speech" action="https://example.test/next" method="POST" speechTimeout="auto" speechModel="phone_call" enhanced="true"><Say voice="alice">Go ahead</Say></Gather>"#
        ));
    }

    #[test]
    fn test_escapes_text_and_urls() {
        assert_eq!(
            xml_escape(r#"Tom & "Jerry" <it's>"#),
            "Tom &amp; &quot;Jerry&quot; &lt;it&apos;s&gt;"
        );

        let xml = VoiceResponse::new()
            .redirect("https://example.test/voice?a=1&b=2")
            .to_xml();
        assert!(xml.contains(
            r#"<Redirect method="POST">https://example.test/voice?a=1&amp;b=2</Redirect>"#
        ));
    }

    #[test]
    fn test_drops_control_characters() {
        assert_eq!(xml_escape("a\u{0}b\u{8}c\u{1B}d"), "abcd");
        assert_eq!(xml_escape("line\none\tand\rtwo"), "line\none\tand\rtwo");

        let xml = VoiceResponse::new()
            .say(Say::new("alice", "bad\u{7}reply"))
            .to_xml();
        assert!(xml.contains(r#"<Say voice="alice">badreply</Say>"#));
    }

    #[test]
    fn test_ends_call() {
        assert!(VoiceResponse::new().hangup().ends_call());
        assert!(!VoiceResponse::new().redirect("/x").ends_call());
    }
}
