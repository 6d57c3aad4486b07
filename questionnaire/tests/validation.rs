//! Validation through a running questionnaire

use questionnaire::{
    AllAnswered, Answer, AnswerCheck, AnswerOption, AnswerRule, AnswerType, Content, GreaterThan,
    Item, ItemCheck, ItemRule, LessThan, ManualClock, MaxLength, NotBlank, Questionnaire, Required,
    Severity,
};

fn contact_item() -> anyhow::Result<Item> {
    Ok(Item::new("contact", "How can we reach you?")?
        .with_answers([
            Answer::new(AnswerType::Text)
                .with_data_id("name")
                .with_rule(NotBlank),
            Answer::new(AnswerType::Number)
                .with_data_id("age")
                .with_rule(GreaterThan(0.0))
                .with_rule(LessThan(120.0)),
        ])
        .with_rule(AllAnswered))
}

#[test]
fn test_repeated_checks_do_not_accumulate() -> anyhow::Result<()> {
    let mut q =
        Questionnaire::new(vec![contact_item()?], |_| {})?.with_clock(ManualClock::default());

    let first = q.check_item("contact", true)?;
    let second = q.check_item("contact", true)?;
    assert_eq!(first.len(), second.len());
    assert_eq!(q.validation_issues().len(), second.len());

    let item = q.item("contact")?;
    assert_eq!(item.issues().len(), 1);
    assert_eq!(item.issues()[0].message, "Please answer: name, age");
    assert_eq!(item.find_answer("name")?.issues().len(), 1);
    assert!(item.find_answer("age")?.issues().is_empty());
    Ok(())
}

#[test]
fn test_fixing_answers_clears_issues() -> anyhow::Result<()> {
    let mut q = Questionnaire::new(vec![contact_item()?], |_| {})?;

    q.respond_to("name", "Ada")?;
    q.respond_to("age", 130)?;
    let advance = q.next_q()?;
    assert!(advance.is_blocked());
    let issues = q.validation_issues();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].owner, "contact_a1");
    assert_eq!(issues[0].message, "Must be less than 120");

    q.respond_to("age", 36)?;
    assert!(q.next_q()?.is_completed());
    assert!(q.validation_issues().is_empty());
    Ok(())
}

#[test]
fn test_warnings_do_not_block() -> anyhow::Result<()> {
    let short_name = AnswerCheck::new(|answer: &Answer, _: &Item, _: &Questionnaire| {
        let name = answer.content()?.as_str()?;
        (name.len() < 3).then(|| format!("'{name}' looks like an abbreviation"))
    });
    let mut q = Questionnaire::new(
        vec![
            Item::new("name", "Name?")?.with_answer(
                Answer::new(AnswerType::Text)
                    .with_rule(Required)
                    .with_rule(short_name.with_severity(Severity::Warning)),
            ),
            Item::new("end", "Thanks")?,
        ],
        |_| {},
    )?;

    q.respond("Al")?;
    assert!(!q.next_q()?.is_blocked());
    let issues = q.validation_issues();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].severity, Severity::Warning);
    assert!(!issues[0].is_blocking());
    Ok(())
}

#[test]
fn test_check_answer_only_touches_that_answer() -> anyhow::Result<()> {
    let mut q = Questionnaire::new(vec![contact_item()?], |_| {})?;

    let issues = q.check_answer("contact", "name", false)?;
    assert_eq!(issues.len(), 1);
    let item = q.item("contact")?;
    assert!(item.issues().is_empty());
    assert_eq!(item.find_answer("name")?.issues().len(), 1);
    assert!(q.check_answer("contact", "email", false).is_err());
    Ok(())
}

#[test]
fn test_nested_answer_issues_block() -> anyhow::Result<()> {
    let mut q = Questionnaire::new(
        vec![
            Item::new("pets", "Do you have pets?")?.with_answer(
                Answer::new(AnswerType::Radio)
                    .with_option(AnswerOption::labelled("yes"))
                    .with_option(AnswerOption::labelled("no"))
                    .with_extra_answer(
                        Answer::new(AnswerType::Number)
                            .with_data_id("how_many")
                            .with_rule(GreaterThan(0.0)),
                    ),
            ),
            Item::new("end", "Bye")?,
        ],
        |_| {},
    )?;

    q.respond(0usize)?;
    q.respond_to("how_many", 0)?;
    let advance = q.next_q()?;
    assert!(advance.is_blocked());
    assert_eq!(q.validation_issues()[0].owner, "pets_a0_a0");

    q.respond_to("pets_a0_a0", 2)?;
    assert!(!q.next_q()?.is_blocked());
    assert_eq!(
        q.item("pets")?.answer()?.selected_option().map(AnswerOption::content),
        Some(&Content::from("yes"))
    );
    Ok(())
}

#[test]
fn test_check_validation_covers_unvisited_items() -> anyhow::Result<()> {
    let reject_all = ItemCheck::new(|item: &Item, _: &Questionnaire| {
        Some(format!("{} is never acceptable", item.id()))
    });
    assert_eq!(reject_all.severity(), Severity::Error);

    let mut q = Questionnaire::new(
        vec![
            Item::new("first", "First")?,
            Item::new("later", "Later")?.with_rule(reject_all),
        ],
        |_| {},
    )?;

    assert!(q.validation_issues().is_empty());
    let issues = q.check_validation();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].owner, "later");
    assert_eq!(q.current_item().map(|item| item.id().as_str()), Some("first"));
    Ok(())
}

#[test]
fn test_only_selected_option_follow_ups_are_checked() -> anyhow::Result<()> {
    let mut q = Questionnaire::new(
        vec![
            Item::new("s", "Symptoms?")?.with_answer(
                Answer::new(AnswerType::Checkbox)
                    .with_option(AnswerOption::labelled("tired"))
                    .with_option(
                        AnswerOption::labelled("other").with_extra_answer(
                            Answer::new(AnswerType::Text)
                                .with_data_id("other_text")
                                .with_rule(MaxLength(3)),
                        ),
                    )
                    .with_option(
                        AnswerOption::labelled("spare").with_extra_answer(
                            Answer::new(AnswerType::Text).with_rule(Required),
                        ),
                    ),
            ),
            Item::new("end", "Bye")?,
        ],
        |_| {},
    )?;

    q.respond(vec![0usize, 1])?;
    q.respond_to("other_text", "far too long text")?;
    let advance = q.next_q()?;
    assert!(advance.is_blocked());
    let issues = q.validation_issues();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].owner, "s_a0_o1_a0");

    q.respond(vec![0usize])?;
    let advance = q.next_q()?;
    assert!(!advance.is_blocked());
    assert!(q.validation_issues().is_empty());
    Ok(())
}
