mod composer;
mod layout;

pub use composer::{
    BACKGROUND_KEY, ComposedPrompt, DEFAULT_NEGATIVE_PROMPT, NEGATIVE_PROMPT_KEY, Overrides,
    PromptComposer,
};
pub use layout::{LayoutReader, template_variables};
