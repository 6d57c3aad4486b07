use questionnaire::{Answer, AnswerType, Item, Questionnaire, Required};

/// Four steps exercising every kind of routing.
///
/// `welcome` falls through to `name`, which jumps to `nickname`; a routing
/// function sends `nickname` back to `summary`, which ends the run.
/// `unreachable` is never visited.
pub fn onboarding(
    on_complete: impl FnMut(&Questionnaire) + 'static,
) -> anyhow::Result<Questionnaire> {
    let items = vec![
        Item::new("welcome", "Welcome! This takes about a minute.")?,
        Item::new("name", "What should we call you?")?
            .with_answer(
                Answer::new(AnswerType::Text)
                    .with_data_id("full_name")
                    .with_rule(Required),
            )
            .with_next_item("nickname"),
        Item::new("summary", "That's all, thanks!")?.ending(),
        Item::new("nickname", "Any nickname?")?
            .with_answer(Answer::new(AnswerType::Text).with_data_id("nickname"))
            .with_next_item_fn(|_, _, _| Ok(Some("summary".to_string()))),
        Item::new("unreachable", "Never asked")?.ending(),
    ];

    Ok(Questionnaire::new(items, on_complete)?
        .with_name("Onboarding")
        .with_version("1"))
}
