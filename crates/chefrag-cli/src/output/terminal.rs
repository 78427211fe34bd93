//! Terminal output formatter

use chefrag_core::{AnswerResult, ConversationRecord};

pub fn format_answer(conversation_id: Option<&str>, result: &AnswerResult) -> String {
    let mut output = String::new();

    output.push_str(&result.answer);
    output.push_str("\n\n");
    output.push_str(&format!("Response time:   {:.2}s\n", result.response_time));
    output.push_str(&format!("Relevance:       {}\n", result.relevance));
    if !result.relevance_explanation.is_empty() {
        output.push_str(&format!("Explanation:     {}\n", result.relevance_explanation));
    }
    output.push_str(&format!("Model:           {}\n", result.model_used));
    output.push_str(&format!(
        "Tokens:          {} (evaluation {})\n",
        result.usage.total_tokens, result.eval_usage.total_tokens
    ));
    if let Some(id) = conversation_id {
        output.push_str(&format!("Conversation:    {}\n", id));
    }

    output
}

pub fn format_conversations(records: &[ConversationRecord]) -> String {
    if records.is_empty() {
        return "No conversations yet.\n".to_string();
    }

    let mut output = String::new();

    for record in records {
        let vote = match record.feedback {
            Some(v) if v > 0 => "+1",
            Some(_) => "-1",
            None => "",
        };
        output.push_str(&format!(
            "{} {} [{}] {} {}\n",
            record.timestamp, record.id, record.relevance, record.model_used, vote
        ));
        output.push_str(&format!("  Q: {}\n", record.question));
        output.push_str(&format!("  A: {}\n", first_line(&record.answer)));
    }

    output
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}
