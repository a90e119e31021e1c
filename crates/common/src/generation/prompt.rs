//! Prompt templates for article drafting

use crate::config::PromptStyle;

const PLAIN_TEMPLATE: &str = "\
Write a blog article about the following topic.
Topic: {topic}

Include the following elements:
- A catchy title
- An introduction
- A body divided into several sections
- A conclusion

Make the article easy to read and rich in useful information.";

const MARKDOWN_TEMPLATE: &str = "\
Write a blog article about the following topic.
Topic: {topic}

Include the following elements:
- A catchy title as a level-one heading (# Title)
- An introduction
- A body divided into several sections, each with a level-two heading (## Section)
- A conclusion

Formatting rules:
- Use **bold** for key terms and *italics* for light emphasis
- Use \"- \" bullet lists where a list helps
- Separate paragraphs with a blank line

Make the article easy to read and rich in useful information.";

/// Substitute `topic` into the template for `style`
pub fn build_prompt(style: PromptStyle, topic: &str) -> String {
    let template = match style {
        PromptStyle::Plain => PLAIN_TEMPLATE,
        PromptStyle::Markdown => MARKDOWN_TEMPLATE,
    };
    template.replace("{topic}", topic.trim())
}
