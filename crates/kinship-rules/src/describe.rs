//! Generic path descriptions for paths no rule names

use kinship_domain::{Gender, MemberLookup, Path, RelationshipType};

/// Describe a path step by step, e.g. "father's sister's husband"
///
/// Each word names the next member relative to the previous one, using the
/// next member's gender where the step alone does not fix it.
pub fn describe_path<L: MemberLookup + ?Sized>(path: &Path, members: &L) -> String {
    if path.is_empty() {
        return "self".to_string();
    }

    path.steps()
        .iter()
        .map(|step| {
            let gender = members.gender(step.to).unwrap_or_default();
            step_word(step.kind, gender)
        })
        .collect::<Vec<_>>()
        .join("'s ")
}

fn step_word(kind: RelationshipType, next: Gender) -> &'static str {
    match kind {
        // current is the child of next
        RelationshipType::Child => match next {
            Gender::Male => "father",
            Gender::Female => "mother",
            Gender::Unknown => "parent",
        },
        RelationshipType::Father | RelationshipType::Mother => match next {
            Gender::Male => "son",
            Gender::Female => "daughter",
            Gender::Unknown => "child",
        },
        RelationshipType::Husband => "wife",
        RelationshipType::Wife => "husband",
    }
}
