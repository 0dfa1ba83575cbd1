//! Prompt template for question → SQLite translation.
//!
//! The prompt is fixed apart from the question, which is appended once at the
//! very end as `Q: <question>` followed by an open `SQL:` line for the model
//! to complete.

use crate::relation::RELATIONS;

/// A worked question → SQL pair shown to the model.
#[derive(Debug, Clone, Copy)]
pub struct Example {
  pub question: &'static str,
  pub sql:      &'static str,
}

const PERSONA: &str = "You are an expert SQL developer. Your ONLY job is to translate \
natural language questions into syntactically correct **SQLite** queries.";

const RULES: &str = "\
🔧 Rules:
- 🔥 Output **only** the SQL query. No extra comments, explanations, or formatting.
- ✅ Use only **SQLite-compatible** syntax.
- ❌ DO NOT use unsupported functions like `EXTRACT`, `DATE_TRUNC`, `TO_CHAR`, etc.
- 📅 For date manipulations, use **`strftime()`**:
  - `%Y-%m` for month
  - `%Y-%m-%d` for day
  - Always apply it with **table alias**, e.g. `strftime('%Y-%m', ad_sales.date)`
- 🔄 Avoid ambiguity in JOINs — always qualify column names with table alias.
- 🧮 Use **GROUP BY** if aggregation like `SUM`, `AVG`, `COUNT` is used.
- 👀 Use `JOIN` only if columns like `item_id` or `date` exist in both tables.
- 💡 When combining metrics (e.g., ad_sales + total_sales), make sure both fields exist in context.
- 🧩 Always use variables along with table names so that it is more specific when joining 2 different tables.";

pub const EXAMPLES: &[Example] = &[
  Example {
    question: "What is my total sales?",
    sql:      "SELECT SUM(total_sales.total_sales) AS total_sales FROM total_sales;",
  },
  Example {
    question: "Calculate the RoAS (Return on Ad Spend).",
    sql:      "SELECT SUM(ad_sales.ad_sales) * 1.0 / SUM(ad_sales.ad_spend) AS roas FROM ad_sales;",
  },
  Example {
    question: "Which product had the highest CPC?",
    sql:      "SELECT ad_sales.item_id, ad_sales.ad_spend * 1.0 / ad_sales.clicks AS cpc FROM ad_sales \
               WHERE ad_sales.clicks > 0 ORDER BY cpc DESC LIMIT 1;",
  },
  Example {
    question: "What is the sales of each month?",
    sql:      "SELECT strftime('%Y-%m', ad_sales.date) AS month, SUM(ad_sales.ad_sales + total_sales.total_sales) \
               AS total_monthly_sales FROM ad_sales JOIN total_sales ON ad_sales.item_id = total_sales.item_id \
               AND strftime('%Y-%m', ad_sales.date) = strftime('%Y-%m', total_sales.date) GROUP BY month;",
  },
  Example {
    question: "What is the sales of each date?",
    sql:      "SELECT ad_sales.date, SUM(ad_sales.ad_sales + total_sales.total_sales) AS total_daily_sales \
               FROM ad_sales JOIN total_sales ON ad_sales.item_id = total_sales.item_id \
               AND ad_sales.date = total_sales.date GROUP BY ad_sales.date;",
  },
  Example {
    question: "Which item has the highest sales?",
    sql:      "SELECT ad_sales.item_id, SUM(ad_sales.ad_sales + total_sales.total_sales) AS total_item_sales \
               FROM ad_sales JOIN total_sales ON ad_sales.item_id = total_sales.item_id \
               GROUP BY ad_sales.item_id ORDER BY total_item_sales DESC LIMIT 1;",
  },
  Example {
    question: "Total clicks and units sold per item?",
    sql:      "SELECT ad_sales.item_id, SUM(ad_sales.clicks) AS total_clicks, SUM(ad_sales.units_sold) \
               AS total_units_sold FROM ad_sales GROUP BY ad_sales.item_id;",
  },
  Example {
    question: "Items with no eligibility message?",
    sql:      "SELECT eligibility.item_id FROM eligibility WHERE eligibility.message IS NULL;",
  },
  Example {
    question: "Items eligible in last 30 days?",
    sql:      "SELECT eligibility.item_id FROM eligibility \
               WHERE eligibility.eligibility_datetime_utc >= date('now', '-30 days');",
  },
  Example {
    question: "Sales growth month-over-month?",
    sql:      "SELECT strftime('%Y-%m', ad_sales.date) AS month, SUM(ad_sales.ad_sales + total_sales.total_sales) \
               AS total_sales FROM ad_sales JOIN total_sales ON ad_sales.item_id = total_sales.item_id \
               AND ad_sales.date = total_sales.date GROUP BY month ORDER BY month;",
  },
  Example {
    question: "CTR (Click-through Rate) per item?",
    sql:      "SELECT ad_sales.item_id, SUM(ad_sales.clicks) * 1.0 / SUM(ad_sales.impressions) AS ctr \
               FROM ad_sales WHERE ad_sales.impressions > 0 GROUP BY ad_sales.item_id;",
  },
  Example {
    question: "Conversion Rate (units_sold to clicks)?",
    sql:      "SELECT ad_sales.item_id, SUM(ad_sales.units_sold) * 1.0 / SUM(ad_sales.clicks) AS conversion_rate \
               FROM ad_sales WHERE ad_sales.clicks > 0 GROUP BY ad_sales.item_id;",
  },
  Example {
    question: "Eligible items with total sales?",
    sql:      "SELECT eligibility.item_id, SUM(total_sales.total_sales) AS total_sales FROM eligibility \
               JOIN total_sales ON eligibility.item_id = total_sales.item_id \
               WHERE eligibility.eligibility = 'TRUE' GROUP BY eligibility.item_id;",
  },
  Example {
    question: "Sales of items marked ineligible?",
    sql:      "SELECT eligibility.item_id, SUM(total_sales.total_sales) AS total_sales FROM eligibility \
               JOIN total_sales ON eligibility.item_id = total_sales.item_id \
               WHERE eligibility.eligibility = 'FALSE' GROUP BY eligibility.item_id;",
  },
  Example {
    question: "Top 5 products by ad_spend?",
    sql:      "SELECT ad_sales.item_id, SUM(ad_sales.ad_spend) AS total_spend FROM ad_sales \
               GROUP BY ad_sales.item_id ORDER BY total_spend DESC LIMIT 5;",
  },
  Example {
    question: "Most recent eligibility message per item?",
    sql:      "SELECT eligibility.item_id, MAX(eligibility.eligibility_datetime_utc) AS latest_check \
               FROM eligibility GROUP BY eligibility.item_id;",
  },
];

/// Everything in the prompt that precedes the question.
fn preamble() -> String {
  let mut out = String::with_capacity(6 * 1024);

  out.push_str(PERSONA);
  out.push_str("\n\n");
  out.push_str(RULES);

  out.push_str("\n\n📦 SQLite Database Schema:\n");
  for relation in RELATIONS {
    out.push_str(&format!("- {}\n", relation.signature()));
  }

  out.push_str("\n📘 Examples:\n");
  for example in EXAMPLES {
    out.push_str(&format!("Q: {}\nSQL: {}\n\n", example.question, example.sql));
  }

  out.push_str("Now convert this question into SQL:\n");
  out
}

/// Build the full prompt for `question`. The question is forwarded verbatim.
pub fn build_prompt(question: &str) -> String {
  let mut prompt = preamble();
  prompt.push_str(&format!("Q: {question}\nSQL:\n"));
  prompt
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn question_is_substituted_once_at_the_end() {
    let q = "Which item had the most impressions last week?";
    let prompt = build_prompt(q);
    assert_eq!(prompt.matches(q).count(), 1);
    assert!(prompt.ends_with(&format!("Q: {q}\nSQL:\n")));
  }

  #[test]
  fn everything_but_the_question_is_fixed() {
    let a = build_prompt("first question");
    let b = build_prompt("a completely different one; DROP TABLE ad_sales;");
    let fixed_a = a.strip_suffix("Q: first question\nSQL:\n").unwrap();
    let fixed_b = b
      .strip_suffix("Q: a completely different one; DROP TABLE ad_sales;\nSQL:\n")
      .unwrap();
    assert_eq!(fixed_a, fixed_b);
  }

  #[test]
  fn schemas_are_written_literally() {
    let prompt = build_prompt("anything");
    for line in [
      "- ad_sales(date, item_id, ad_sales, impressions, ad_spend, clicks, units_sold)",
      "- total_sales(date, item_id, total_sales, total_units_ordered)",
      "- eligibility(eligibility_datetime_utc, item_id, eligibility, message)",
    ] {
      assert!(prompt.contains(line), "missing schema line {line:?}");
    }
  }

  #[test]
  fn every_worked_example_is_present() {
    let prompt = build_prompt("anything");
    assert_eq!(EXAMPLES.len(), 16);
    for ex in EXAMPLES {
      assert!(prompt.contains(&format!("Q: {}\nSQL: {}\n", ex.question, ex.sql)));
    }
  }

  #[test]
  fn rules_cover_dialect_and_grouping() {
    let prompt = build_prompt("anything");
    assert!(prompt.contains("strftime()"));
    assert!(prompt.contains("GROUP BY"));
    assert!(prompt.contains("qualify column names with table alias"));
  }

  #[test]
  fn empty_question_is_accepted() {
    assert!(build_prompt("").ends_with("Q: \nSQL:\n"));
  }
}
