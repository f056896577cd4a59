//! Canned answers for the chat assistant.
//!
//! A [`ResponseCatalog`] is an ordered table of topic keywords. Lookup
//! lower-cases the prompt and returns the answer of the first keyword the
//! prompt contains, falling back to a generic answer.

/// Greeting shown as the first assistant message of every conversation.
pub const GREETING: &str = "Hello! I'm LAB-BUDDY, your intelligent lab assistant. I can help you with:\n\n\
• Step-by-step experiment guidance\n\
• Instrument usage and setup\n\
• Error diagnosis and troubleshooting\n\
• Understanding lab concepts\n\n\
What would you like to learn about today?";

/// Starter questions offered while the conversation holds only the greeting.
pub const SUGGESTED_QUESTIONS: [&str; 4] = [
    "How do I set up an oscilloscope for measuring AC voltage?",
    "What's the correct procedure for using a multimeter?",
    "Explain Ohm's Law experiment step by step",
    "How do I calibrate a pH meter before use?",
];

const OSCILLOSCOPE: &str = "Great question! Here's how to set up an oscilloscope for measuring AC voltage:\n\n\
**Step 1: Initial Setup**\n\
• Turn on the oscilloscope and wait for it to initialize\n\
• Connect the probe to Channel 1\n\n\
**Step 2: Configure Settings**\n\
• Set the coupling to AC mode\n\
• Adjust VOLT/DIV to expected voltage range\n\
• Set TIME/DIV for your signal frequency\n\n\
**Step 3: Connect & Measure**\n\
• Attach probe tip to your signal source\n\
• Connect ground clip to circuit ground\n\
• Adjust trigger to stabilize the waveform\n\n\
⚡ **Pro Tip:** Start with higher VOLT/DIV and work down to avoid clipping!";

const MULTIMETER: &str = "Here's the correct procedure for using a digital multimeter:\n\n\
**Safety First:**\n\
⚠️ Always check the multimeter rating matches your circuit\n\
⚠️ Never measure resistance on a live circuit\n\n\
**For Voltage Measurement:**\n\
1. Set the dial to V~ (AC) or V⎓ (DC)\n\
2. Insert black probe in COM, red in VΩ\n\
3. Touch probes to circuit points in parallel\n\n\
**For Current Measurement:**\n\
1. Set dial to A~ or A⎓\n\
2. Move red probe to current jack\n\
3. Connect in series with the load\n\n\
**For Resistance:**\n\
1. Ensure circuit is de-energized\n\
2. Set dial to Ω\n\
3. Touch probes across component";

const FALLBACK: &str = "That's a great question! Based on my analysis, here's what you need to know:\n\n\
I can provide detailed guidance on this topic. The key points to consider are:\n\n\
1. **Preparation**: Ensure you have all required equipment ready\n\
2. **Procedure**: Follow the standard laboratory protocol\n\
3. **Safety**: Always wear appropriate PPE\n\
4. **Recording**: Document all observations systematically\n\n\
Would you like me to elaborate on any specific aspect? I can also help you with:\n\
• Troubleshooting common issues\n\
• Understanding theoretical concepts\n\
• Suggesting alternative approaches";

/// A keyword and the answer it selects.
#[derive(Debug, Clone)]
pub struct Topic {
    /// Lower-case substring searched for in the prompt.
    pub keyword: String,
    pub answer: String,
}

/// Ordered keyword table with a fallback answer.
///
/// # Examples
///
/// ```
/// use lab_buddy::ResponseCatalog;
///
/// let catalog = ResponseCatalog::builtin();
/// assert!(catalog.select("My OSCILLOSCOPE is noisy").contains("VOLT/DIV"));
/// assert_eq!(catalog.select("hello"), catalog.fallback());
/// ```
#[derive(Debug, Clone)]
pub struct ResponseCatalog {
    topics: Vec<Topic>,
    fallback: String,
}

impl ResponseCatalog {
    /// Build a catalog from `(keyword, answer)` pairs. Keywords are
    /// lower-cased; table order decides ties.
    pub fn new<K, A>(topics: impl IntoIterator<Item = (K, A)>, fallback: impl Into<String>) -> Self
    where
        K: Into<String>,
        A: Into<String>,
    {
        Self {
            topics: topics
                .into_iter()
                .map(|(k, a)| Topic {
                    keyword: k.into().to_lowercase(),
                    answer: a.into(),
                })
                .collect(),
            fallback: fallback.into(),
        }
    }

    /// The assistant's stock answers.
    pub fn builtin() -> Self {
        Self::new(
            [("oscilloscope", OSCILLOSCOPE), ("multimeter", MULTIMETER)],
            FALLBACK,
        )
    }

    /// Pick the answer for `prompt`. The first keyword in table order that
    /// occurs in the prompt wins.
    pub fn select(&self, prompt: &str) -> &str {
        let lower = prompt.to_lowercase();
        self.topics
            .iter()
            .find(|t| lower.contains(&t.keyword))
            .map(|t| t.answer.as_str())
            .unwrap_or(&self.fallback)
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

impl Default for ResponseCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
