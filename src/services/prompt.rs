use crate::models::entities::ConversationTurn;

use super::catalog::{ApprovedCatalog, BlockedList};

/// Number of prior turns forwarded to the provider.
pub const DEFAULT_HISTORY_WINDOW: usize = 10;

pub const NO_CATALOG_FALLBACK: &str =
    "Approved products: (none provided by the client, use generic drink components only)";

pub const BLOCKED_HEADER: &str = "Do NOT mention or recommend any of these brand names:";

const PERSONA_PROMPT: &str = "\
You are the Cocktail Recipe Assistant on the brand's official website.
Your job is to create cocktail recipes with a natural, in-store brand voice.
Use ONLY the approved products when a branded base is needed.
If the user asks for an off-catalog brand, just create the recipe using the best
fit from the approved list without calling attention to substitutions.";

const STYLE_PROMPT: &str = "\
STYLE GUIDELINES
- Tone: friendly, concise, professional. No over-explaining brand details.
- Never say \"replace X with Y\", \"X was replaced by Y\" or similar. Just present the recipe naturally.
- Keep ingredient lists tight and specific; use exact approved product names when applicable.
- Generic mixers (lime juice, simple syrup, soda water, etc.) are fine.
- If the user asks for a recipe that requires something not in the approved list,
  build it around the closest approved product without calling this out.";

const OUTPUT_FORMAT_PROMPT: &str = "\
OUTPUT FORMAT (plain text):
Title
Ingredients
- list (1 per line)
Instructions
1. step
2. step
Notes (optional)
- brief, if helpful";

/// Build the system instruction text from the approved and blocked lists.
///
/// Pure: the same lists always produce byte-identical output. Each list entry
/// appears once as a `- name` line because [`BrandList`](super::catalog::BrandList)
/// is already de-duplicated.
pub fn build_system_prompt(approved: &ApprovedCatalog, blocked: &BlockedList) -> String {
    let mut sections = vec![PERSONA_PROMPT.to_string()];

    if approved.is_empty() {
        sections.push(NO_CATALOG_FALLBACK.to_string());
    } else {
        sections.push(format!(
            "Approved products (use by exact name when a branded base is needed):\n{}",
            bulleted(approved.iter())
        ));
    }

    if !blocked.is_empty() {
        sections.push(format!("{BLOCKED_HEADER}\n{}", bulleted(blocked.iter())));
    }

    sections.push(STYLE_PROMPT.to_string());
    sections.push(OUTPUT_FORMAT_PROMPT.to_string());
    sections.join("\n\n")
}

fn bulleted<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `[system] + last `window` history turns + [user]`, oldest first.
pub fn assemble_messages(
    system_prompt: &str,
    history: &[ConversationTurn],
    user_message: &str,
    window: usize,
) -> Vec<ConversationTurn> {
    let clipped = &history[history.len().saturating_sub(window)..];

    let mut messages = Vec::with_capacity(clipped.len() + 2);
    messages.push(ConversationTurn::system(system_prompt));
    messages.extend(clipped.iter().cloned());
    messages.push(ConversationTurn::user(user_message));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entities::MessageRole;
    use crate::services::catalog::BrandList;

    #[test]
    fn empty_lists_use_fallback_and_skip_blocked_section() {
        let prompt = build_system_prompt(&BrandList::default(), &BrandList::default());
        assert!(prompt.contains(NO_CATALOG_FALLBACK));
        assert!(!prompt.contains(BLOCKED_HEADER));
        assert!(prompt.contains("OUTPUT FORMAT"));
    }

    #[test]
    fn catalog_entries_are_bulleted_once() {
        let approved = BrandList::new(["Ponche Kuba", "ponche kuba", "Soju Peach", "Soju Peach"]);
        let prompt = build_system_prompt(&approved, &BrandList::default());
        assert_eq!(prompt.matches("- Ponche Kuba\n").count(), 1);
        assert_eq!(prompt.matches("- Soju Peach").count(), 1);
        assert!(!prompt.contains("- ponche kuba"));
        assert!(!prompt.contains(NO_CATALOG_FALLBACK));
    }

    #[test]
    fn blocked_section_lists_brands() {
        let blocked = BrandList::new(["Absolut", "Smirnoff"]);
        let prompt = build_system_prompt(&BrandList::default(), &blocked);
        assert!(prompt.contains(&format!("{BLOCKED_HEADER}\n- Absolut\n- Smirnoff")));
    }

    #[test]
    fn prompt_is_deterministic() {
        let approved = BrandList::new(["Lunazul Blanco", "Soju Original"]);
        let blocked = BrandList::new(["Patron"]);
        assert_eq!(
            build_system_prompt(&approved, &blocked),
            build_system_prompt(&approved, &blocked)
        );
    }

    #[test]
    fn history_is_clipped_to_window() {
        let history: Vec<_> = (0..15)
            .map(|i| ConversationTurn::user(format!("turn {i}")))
            .collect();
        let messages = assemble_messages("sys", &history, "latest", DEFAULT_HISTORY_WINDOW);

        assert_eq!(messages.len(), 12);
        assert_eq!(messages[0], ConversationTurn::system("sys"));
        assert_eq!(messages[1].content, "turn 5");
        assert_eq!(messages[10].content, "turn 14");
        assert_eq!(messages[11], ConversationTurn::user("latest"));
    }

    #[test]
    fn short_history_is_kept_verbatim() {
        let history = vec![
            ConversationTurn::user("Something with tequila"),
            ConversationTurn::assistant("Paloma\nIngredients"),
        ];
        let messages = assemble_messages("sys", &history, "Make it spicy", 10);
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[2].role, MessageRole::Assistant);
        assert_eq!(messages[2].content, "Paloma\nIngredients");
    }
}
