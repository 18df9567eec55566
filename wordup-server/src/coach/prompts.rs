use super::text_stats::TranscriptStats;

pub const FEEDBACK_TEMPERATURE: f32 = 0.7;
pub const IMPROVER_TEMPERATURE: f32 = 0.75;

/// Rewrite styles offered by the speech improver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnalysisType {
    #[default]
    Full,
    Grammar,
    Vocabulary,
    Academic,
    Conversational,
    Persuasive,
    Concise,
    Formal,
}

impl AnalysisType {
    /// Unknown or missing values fall back to a full analysis.
    pub fn parse_lossy(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("grammar") => AnalysisType::Grammar,
            Some("vocabulary") => AnalysisType::Vocabulary,
            Some("academic") => AnalysisType::Academic,
            Some("conversational") => AnalysisType::Conversational,
            Some("persuasive") => AnalysisType::Persuasive,
            Some("concise") => AnalysisType::Concise,
            Some("formal") => AnalysisType::Formal,
            _ => AnalysisType::Full,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Full => "full",
            AnalysisType::Grammar => "grammar",
            AnalysisType::Vocabulary => "vocabulary",
            AnalysisType::Academic => "academic",
            AnalysisType::Conversational => "conversational",
            AnalysisType::Persuasive => "persuasive",
            AnalysisType::Concise => "concise",
            AnalysisType::Formal => "formal",
        }
    }
}

pub fn feedback_prompt(transcript: &str, stats: &TranscriptStats) -> String {
    format!(
        r#"You are a STRICT professional speech coach who gives HONEST, CRITICAL feedback. Be harsh but constructive. Most speeches should score between 50-70 unless truly exceptional.

Speech Transcript ({words} words, {sentences} sentences, {fillers} filler words detected):
"{transcript}"

CRITICAL ANALYSIS REQUIRED:
Respond ONLY with valid JSON (no markdown, no extra text). Use this EXACT structure:

{{
  "overallScore": <number 0-100>,
  "metrics": {{
    "clarity": {{
      "score": <number 0-100>,
      "feedback": "<specific issue or praise, be critical>"
    }},
    "pace": {{
      "score": <number 0-100>,
      "feedback": "<analyze speed, pauses, rhythm - be strict>"
    }},
    "fillerWords": {{
      "score": <number 0-100>,
      "feedback": "<mention filler word count and impact>"
    }},
    "vocabulary": {{
      "score": <number 0-100>,
      "feedback": "<assess word variety, sophistication, repetition>"
    }},
    "structure": {{
      "score": <number 0-100>,
      "feedback": "<evaluate logical flow, organization, transitions>"
    }}
  }},
  "strengths": [
    "<specific strength 1>",
    "<specific strength 2>",
    "<specific strength 3>"
  ],
  "improvements": [
    "<specific actionable improvement 1>",
    "<specific actionable improvement 2>",
    "<specific actionable improvement 3>",
    "<specific actionable improvement 4>"
  ],
  "stats": {{
    "wordCount": {words},
    "sentenceCount": {sentences},
    "fillerWordCount": {fillers},
    "wordsPerMinute": <estimate based on content>,
    "duration": "<estimate in seconds>"
  }}
}}

STRICT SCORING RULES (BE HARSH):
- 90-100: TEDx quality, professional speaker level (VERY RARE)
- 80-89: Excellent, polished, minimal flaws
- 70-79: Good but needs refinement
- 60-69: Average, multiple issues to fix (MOST SPEECHES)
- 50-59: Below average, significant problems
- 40-49: Poor, major overhaul needed
- Below 40: Severely lacking

FILLER WORD SCORING:
- 0 fillers: 100
- 1-3 fillers: 90-95
- 4-7 fillers: 75-85
- 8-12 fillers: 60-70
- 13-20 fillers: 40-55
- 20+ fillers: Below 40

Return ONLY valid JSON."#,
        words = stats.word_count,
        sentences = stats.sentence_count,
        fillers = stats.filler_word_count,
        transcript = transcript,
    )
}

pub fn improver_prompt(analysis_type: AnalysisType, draft: &str) -> String {
    let (instructions, closing) = match analysis_type {
        AnalysisType::Full => (
            "You are an expert speech coach. Analyze this speech with a professional, clean format.

IMPORTANT: Write in plain text only. No markdown, no asterisks, no special formatting. Use simple dashes for bullet points.

Provide your analysis in this exact format:

IMPROVED VERSION:
[Write the improved speech here in plain text]

STRENGTHS:
- [First strength]
- [Second strength]
- [Third strength]

AREAS FOR IMPROVEMENT:
- [First area]
- [Second area]
- [Third area]

SPECIFIC SUGGESTIONS:
- [First tip]
- [Second tip]
- [Third tip]",
            "Remember: Keep it professional, encouraging, and formatted cleanly with NO markdown symbols.",
        ),
        AnalysisType::Grammar => (
            "You are a grammar expert. Fix ONLY grammar errors in this speech.

IMPORTANT: Write in plain text only. No markdown, no asterisks, no special formatting.

Provide your analysis in this exact format:

CORRECTED VERSION:
[Write the corrected speech here]

GRAMMAR ISSUES FOUND:
- Issue 1: [Describe the error and why it's wrong]
- Issue 2: [Describe the error and why it's wrong]
- Issue 3: [Describe the error and why it's wrong]

GRAMMAR TIPS:
- Tip 1: [Practical advice]
- Tip 2: [Practical advice]
- Tip 3: [Practical advice]",
            "Be detailed but keep formatting clean and professional.",
        ),
        AnalysisType::Vocabulary => (
            "You are a vocabulary enhancement specialist. Improve word choices in this speech.

IMPORTANT: Write in plain text. No markdown or special characters.

Format your response like this:

ENHANCED VERSION:
[Rewrite with better vocabulary]

VOCABULARY UPGRADES:
- Changed [old word] to [new word] because [reason]
- Changed [old word] to [new word] because [reason]
- Changed [old word] to [new word] because [reason]

CONTEXT TIPS:
- [Tip about word choice]
- [Tip about word choice]
- [Tip about word choice]",
            "Keep tone natural while elevating vocabulary.",
        ),
        AnalysisType::Academic => (
            "You are an academic writing expert. Transform this into academic tone.

IMPORTANT: Plain text only. No markdown formatting.

Format:

ACADEMIC VERSION:
[Rewritten in formal academic language]

TONE ADJUSTMENTS:
- Changed: [What you changed and why]
- Changed: [What you changed and why]
- Changed: [What you changed and why]

ACADEMIC WRITING TIPS:
- [Tip 1]
- [Tip 2]
- [Tip 3]",
            "Use formal language, avoid contractions, add transitional phrases.",
        ),
        AnalysisType::Conversational => (
            "You are a conversational speech coach. Make this natural and engaging.

IMPORTANT: Plain text format only.

Format:

CONVERSATIONAL VERSION:
[Rewritten in natural, friendly tone]

ENGAGEMENT TECHNIQUES:
- [Technique 1 used]
- [Technique 2 used]
- [Technique 3 used]

DELIVERY TIPS:
- [Tip 1]
- [Tip 2]
- [Tip 3]",
            "Use contractions, casual language, rhetorical questions where appropriate.",
        ),
        AnalysisType::Persuasive => (
            "You are a persuasive communication expert. Make this speech highly persuasive.

IMPORTANT: Clean plain text format.

Format:

PERSUASIVE VERSION:
[Rewritten with persuasive techniques]

PERSUASIVE ELEMENTS ADDED:
- Ethos: [How you established credibility]
- Pathos: [How you appealed to emotion]
- Logos: [How you used logic]

IMPACT TIPS:
- [Tip 1]
- [Tip 2]
- [Tip 3]",
            "Add powerful calls to action and emotional appeals.",
        ),
        AnalysisType::Concise => (
            "You are a conciseness expert. Make this speech shorter and punchier.

IMPORTANT: Plain text only, no formatting symbols.

Format:

CONCISE VERSION:
[Shortened version keeping core message]

WHAT WAS REMOVED:
- [Removed redundancy 1]
- [Removed redundancy 2]
- [Removed redundancy 3]

BREVITY TIPS:
- [Tip 1]
- [Tip 2]
- [Tip 3]",
            "Aim to reduce word count by 30-40% while keeping key points.",
        ),
        AnalysisType::Formal => (
            "You are a business communication expert. Make this professionally formal.

IMPORTANT: Plain text format, professional tone.

Format:

FORMAL VERSION:
[Rewritten in professional business tone]

FORMALITY ADJUSTMENTS:
- Changed: [What was informalized and how]
- Changed: [What was informalized and how]
- Changed: [What was informalized and how]

PROFESSIONAL TIPS:
- [Tip 1]
- [Tip 2]
- [Tip 3]",
            "Use professional vocabulary, formal structure, business-appropriate language.",
        ),
    };

    format!("{instructions}\n\nOriginal Speech: \"{draft}\"\n\n{closing}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_analysis_type_is_full() {
        assert_eq!(AnalysisType::parse_lossy(None), AnalysisType::Full);
        assert_eq!(AnalysisType::parse_lossy(Some("poetic")), AnalysisType::Full);
        assert_eq!(
            AnalysisType::parse_lossy(Some("concise")),
            AnalysisType::Concise
        );
    }

    #[test]
    fn feedback_prompt_embeds_transcript_and_counts() {
        let stats = TranscriptStats {
            word_count: 12,
            sentence_count: 2,
            filler_word_count: 3,
        };
        let prompt = feedback_prompt("Hello there", &stats);

        assert!(prompt.contains("(12 words, 2 sentences, 3 filler words detected)"));
        assert!(prompt.contains("\"Hello there\""));
        assert!(prompt.contains("\"wordCount\": 12,"));
        assert!(prompt.contains("\"overallScore\": <number 0-100>"));
    }

    #[test]
    fn improver_prompt_names_the_version_heading() {
        let cases = [
            (AnalysisType::Full, "IMPROVED VERSION:"),
            (AnalysisType::Grammar, "CORRECTED VERSION:"),
            (AnalysisType::Vocabulary, "ENHANCED VERSION:"),
            (AnalysisType::Academic, "ACADEMIC VERSION:"),
            (AnalysisType::Conversational, "CONVERSATIONAL VERSION:"),
            (AnalysisType::Persuasive, "PERSUASIVE VERSION:"),
            (AnalysisType::Concise, "CONCISE VERSION:"),
            (AnalysisType::Formal, "FORMAL VERSION:"),
        ];
        for (analysis_type, heading) in cases {
            let prompt = improver_prompt(analysis_type, "My draft");
            assert!(prompt.contains(heading), "{}", analysis_type.as_str());
            assert!(prompt.contains("Original Speech: \"My draft\""));
        }
    }
}
