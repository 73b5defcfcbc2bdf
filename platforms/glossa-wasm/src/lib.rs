use wasm_bindgen::prelude::*;
use glossa_lexer::{Analyzer, LemmaTable, LexError, SurfaceAnalyzer};
use glossa_matcher::{MatchSession, RequestTicket};
use glossa_protocol::{
    validate_tokens, GlossarySnapshot, Lang, MatchGroup, ProtocolError, TermIndex, TextToken, TranslationIndex,
};
use serde::Serialize;

#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// The structured response sent back to the extension's content script
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub lang: String,
    pub tokens: Vec<TextToken>,
    pub groups: Vec<MatchGroup>,
}

/// The Engine Instance running in the Browser
#[wasm_bindgen]
pub struct GlossaEngine {
    session: MatchSession,
    analyzer: SurfaceAnalyzer,
    version: u32,
}

#[wasm_bindgen]
impl GlossaEngine {
    /// `data` is a compiled snapshot, fetched by the extension at startup.
    #[wasm_bindgen(constructor)]
    pub fn new(data: Vec<u8>, lang: String) -> Result<GlossaEngine, JsError> {
        let snapshot = GlossarySnapshot::from_archive_bytes(&data)?;
        Ok(Self::from_snapshot(&snapshot, Lang::new(lang)))
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn lang(&self) -> String {
        self.session.lang().to_string()
    }

    /// Replaces the whole glossary with a newer compiled snapshot.
    pub fn load_snapshot(&mut self, data: Vec<u8>) -> Result<(), JsError> {
        let snapshot = GlossarySnapshot::from_archive_bytes(&data)?;
        self.session.load_snapshot(&snapshot);
        self.version = snapshot.version;
        Ok(())
    }

    /// Returns whether the indexes had to be rebuilt.
    pub fn set_language(&mut self, lang: String) -> bool {
        self.session.set_language(Lang::new(lang))
    }

    /// Live update from the glossary store subscription (`TermIndex[]`).
    pub fn set_terms(&mut self, terms: JsValue) -> Result<bool, JsError> {
        let terms: Vec<TermIndex> = serde_wasm_bindgen::from_value(terms)?;
        Ok(self.session.set_terms(terms))
    }

    /// Live update from the glossary store subscription (`TranslationIndex[]`).
    pub fn set_translations(&mut self, translations: JsValue) -> Result<bool, JsError> {
        let translations: Vec<TranslationIndex> = serde_wasm_bindgen::from_value(translations)?;
        Ok(self.session.set_translations(translations))
    }

    pub fn set_lemma_table(&mut self, json: &str) -> Result<(), JsError> {
        self.analyzer = SurfaceAnalyzer::new(LemmaTable::from_json(json)?);
        Ok(())
    }

    /// Call before sending text to the remote lemmatizer.
    pub fn begin_request(&mut self) -> u32 {
        self.session.begin_request().id()
    }

    /// Matches the lemmatizer's `TextToken[]` for `ticket`. Returns `null`
    /// when a newer request has been started since, and throws when the
    /// tokens are malformed (empty, overlapping or out of order spans).
    pub fn complete(&mut self, ticket: u32, tokens: JsValue) -> Result<JsValue, JsError> {
        let tokens: Vec<TextToken> = serde_wasm_bindgen::from_value(tokens)?;
        match self.complete_tokens(ticket, &tokens)? {
            Some(groups) => Ok(serde_wasm_bindgen::to_value(&groups)?),
            None => Ok(JsValue::NULL),
        }
    }

    /// Offline path: Text -> Surface Analyzer -> Matcher -> JSON
    pub fn analyze_text(&self, text: &str) -> Result<JsValue, JsError> {
        let report = self.report(text)?;
        Ok(serde_wasm_bindgen::to_value(&report)?)
    }
}

impl GlossaEngine {
    pub fn from_snapshot(snapshot: &GlossarySnapshot, lang: Lang) -> Self {
        Self {
            session: MatchSession::from_snapshot(lang, snapshot),
            analyzer: SurfaceAnalyzer::default(),
            version: snapshot.version,
        }
    }

    /// Token streams from the remote lemmatizer are checked before they
    /// reach the matcher.
    pub fn complete_tokens(
        &mut self,
        ticket: u32,
        tokens: &[TextToken],
    ) -> Result<Option<Vec<MatchGroup>>, ProtocolError> {
        validate_tokens(tokens)?;
        Ok(self.session.complete(RequestTicket::from(ticket), tokens))
    }

    pub fn report(&self, text: &str) -> Result<MatchReport, LexError> {
        let lang = self.session.lang();
        let tokens = self.analyzer.analyze(text, lang)?;
        let groups = self.session.match_tokens(&tokens);

        Ok(MatchReport {
            lang: lang.to_string(),
            tokens,
            groups,
        })
    }
}
