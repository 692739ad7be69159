// All LLM prompt constants for the Screening module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for candidate analysis.
pub const ANALYSIS_SYSTEM: &str = "You are HireGenius, an expert talent intelligence analyst \
    with 15 years of experience evaluating candidates against job descriptions.";

/// Candidate analysis prompt template.
/// Replace: {job_description}, {resume_text}, {compliance_instruction}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"JOB DESCRIPTION:
{job_description}

CANDIDATE RESUME:
{resume_text}

Perform a holistic analysis to predict job success.
1. EXTRACT NAME: Identify the candidate's full name from the top of the resume. Use "" if none is present.
2. SKILLS VERIFICATION: Extract key skills. Cross-reference claims with detailed work experience. Be strict:
   - "Inflation Risk": the candidate claims expertise (e.g. "Expert") or lists a skill prominently but shows little usage in experience.
   - "Missing Evidence": the skill is listed but never used in experience.
   - "Verified": the claim is supported by experience.
3. CULTURE FIT: Analyze communication style and values.
4. PREDICTIVE MODELING: Compare to successful profiles, predict retention and ramp-up.
5. INTERVIEW RECOMMENDATIONS: Generate custom questions with a rubric describing a strong answer.

{compliance_instruction}

Return a JSON object with this EXACT schema (no extra fields, all fields required):
{
  "extracted_name": "Jane Doe",
  "recommendation": "Strong Hire" | "Hire" | "Maybe" | "Pass",
  "confidence_score": 0-100 number, confidence in the recommendation,
  "summary": "comprehensive executive summary",
  "skills_analysis": [
    {
      "name": "React",
      "type": "Technical" | "Soft",
      "score": 0-100 number, verified proficiency based on evidence,
      "evidence": "evidence found in the resume; explain discrepancies",
      "status": "Verified" | "Inflation Risk" | "Missing Evidence"
    }
  ],
  "culture_fit": {
    "score": 0-100 number,
    "analysis": "text",
    "flags": ["text"]
  },
  "predictive_modeling": {
    "performance_prediction": "text",
    "retention_risk": "Low" | "Medium" | "High",
    "ramp_up_time": "text",
    "trajectory_analysis": "text",
    "red_flags": ["text"]
  },
  "interview_guide": [
    {"topic": "text", "question": "text", "rubric": "what to look for in the answer"}
  ]
}"#;

/// System prompt for head-to-head comparison.
pub const COMPARISON_SYSTEM: &str =
    "You are a Hiring Manager comparing two candidates for one role.";

/// Comparison prompt template.
/// Replace: {job_description}, {name_a}, {resume_a}, {name_b}, {resume_b}, {compliance_instruction}
pub const COMPARISON_PROMPT_TEMPLATE: &str = r#"Compare two candidates for the following Job Description.

JOB DESCRIPTION:
{job_description}

CANDIDATE A ({name_a}):
{resume_a}

CANDIDATE B ({name_b}):
{resume_b}

Compare them strictly based on the JD. Identify the stronger candidate.

{compliance_instruction}

Return a JSON object with this EXACT schema (no extra fields, all fields required):
{
  "winner_id": "candidateA" | "candidateB" | "tie",
  "winner_name": "display name of the winner, or both names for a tie",
  "reasoning": "text",
  "key_differentiators": ["text"],
  "comparative_skills": [
    {
      "skill": "skill relevant to the JD",
      "candidate_a_strength": "text",
      "candidate_b_strength": "text",
      "winner": "A" | "B" | "Tie"
    }
  ]
}"#;
