//! Fixed instruction strings for the two roast flows.
//!
//! Centralising both prompts here keeps a single source of truth and lets
//! unit tests inspect exactly what is sent upstream without a live API call.
//! The instruction is always the first part of the request; the resume text
//! or page image follows as the second part.

/// Instruction for the text-based roast: content, keywords, and grammar.
pub const TEXT_ROAST_PROMPT: &str = "\
Act as a brutal Google Recruiter.
Analyze this resume snippet and give 3 specific, hard reasons why you would REJECT it.
Then give 1 way to fix it to make it Google-ready.";

/// Instruction for the visual roast: layout, whitespace, and the weakest bullet.
pub const VISUAL_ROAST_PROMPT: &str = "\
Act as a brutal Google Recruiter.
Look at this resume image. I want you to roast two things:
1. The VISUAL LAYOUT: Comment on the whitespace, font choice, density, and formatting. Is it ugly? Is it hard to read?
2. The CONTENT: Pick one specific bullet point that is weak and explain why.

Be harsh but helpful.";
