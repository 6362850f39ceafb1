// Job understanding and resume tailoring.
// Implements: job parsing, requirement extraction, tailoring, ATS scoring.
// Every stage degrades to a deterministic fallback instead of failing.

pub mod job_parser;
pub mod prompts;
pub mod requirements;
pub mod scoring;
pub mod tailor;
