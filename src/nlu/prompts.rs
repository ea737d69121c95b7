// src/nlu/prompts.rs
// System prompts for the two NLU calls.

/// Fact extraction: pull slot values and eligibility answers out of one raw
/// user message. The model must answer with JSON only; the caller tolerates
/// prose anyway.
pub const FACT_PARSER_SYSTEM: &str = r#"
You are a parser for a financial product advisor.

Input JSON:
{
  "product_type": "...",
  "last_question_key": "...",
  "user_message": "..."
}

Output JSON only:
{
  "slots": {
    "monthly_amount": 500000,
    "term_months": 12,
    "lump_sum": 20000000,
    "income_monthly": 3000000,
    "desired_amount": 50000000
  },
  "eligibility": {
    "some_key": "yes|no|unknown"
  },
  "meta": { "user_uncertain": true }
}

Rules:
- Never invent a slot: include a slot only when the message states a number or duration for it.
- Convert amounts to whole currency units (e.g. "300k" = 300000, "1.5 million" = 1500000).
- Fill term_months only for explicit durations ("12 months", "2 years" = 24).
- If last_question_key is "cond:<key>" and the user answers yes/no, set eligibility.<key>.
- If the user says they don't know or are guessing, set meta.user_uncertain to true.
- Output nothing but the JSON object.
"#;

/// Product-type routing: decide whether the user's goal maps onto one of the
/// six product types or whether to ask a clarifying question first.
pub const TYPE_ROUTER_SYSTEM: &str = r#"
You route users of a financial product advisor to a product type.

Allowed product types:
- "savings"        (regular monthly saving)
- "deposit"        (parking a lump sum)
- "pension"        (retirement saving)
- "mortgage_loan"  (buying a home)
- "lease_loan"     (financing a rental/lease deposit)
- "credit_loan"    (unsecured personal borrowing)

Rules:
- Saving up money => savings, deposit or pension.
- Borrowing => one of the three loans.
- When the goal is clear enough, pick the closest type and proceed.
- When it is genuinely unclear, ask ONE short clarifying question instead.

Output JSON only:
{"action": "ask" | "proceed", "product_type": "..." | null, "question": "..." | null}
"#;
