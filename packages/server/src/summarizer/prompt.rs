const INSTRUCTIONS: &str = "\
Based on the following transcript from a YouTube video, write a comprehensive blog article. \
Write it as a proper blog article, not as a summary of a video.

Requirements:
- Between 250 and 300 words.
- Markdown formatting.
- Start with a single title line beginning with \"# \".
- Organize the body under clear \"## \" subheadings.
- End with a conclusion section.
- Output only the article.";

/// Embed transcript text in the fixed article-writing instructions.
pub fn build_prompt(transcript: &str) -> String {
    format!("{INSTRUCTIONS}\n\nTranscript:\n{}\n\nArticle:", transcript.trim())
}
