use questionnaire::{
    AllAnswered, Answer, AnswerCheck, AnswerOption, AnswerRule, AnswerType, GreaterThan, Item,
    LessThan, NotBlank, Questionnaire, Severity,
};

/// Warns on addresses that don't look like `user@domain.tld`.
pub fn validate_email(answer: &Answer, _: &Item, _: &Questionnaire) -> Option<String> {
    let email = answer.content()?.as_str()?;
    let looks_valid = email
        .split_once('@')
        .is_some_and(|(user, domain)| !user.is_empty() && domain.contains('.'));
    (!looks_valid).then(|| format!("'{email}' doesn't look like an email address"))
}

/// One item with several answers. Going back clears what was typed.
pub fn contact_details(
    on_complete: impl FnMut(&Questionnaire) + 'static,
) -> anyhow::Result<Questionnaire> {
    let items = vec![
        Item::new("contact", "How can we reach you?")?
            .with_answers([
                Answer::new(AnswerType::Text)
                    .with_data_id("name")
                    .with_label("Name")
                    .with_rule(NotBlank),
                Answer::new(AnswerType::Text)
                    .with_data_id("email")
                    .with_label("Email")
                    .with_rule(NotBlank)
                    .with_rule(AnswerCheck::new(validate_email).with_severity(Severity::Warning)),
                Answer::new(AnswerType::Number)
                    .with_data_id("age")
                    .with_label("Age")
                    .with_rule(GreaterThan(17.0))
                    .with_rule(LessThan(120.0)),
            ])
            .with_rule(AllAnswered),
        Item::new("consent", "May we contact you about future studies?")?
            .with_answer(
                Answer::new(AnswerType::Radio)
                    .with_data_id("consent")
                    .with_options([AnswerOption::valued(true), AnswerOption::valued(false)])
                    .with_default(1usize),
            )
            .ending(),
    ];

    Ok(Questionnaire::new(items, on_complete)?
        .with_name("Contact details")
        .with_reset_items_on_back(true))
}
