use std::cell::Cell;
use std::rc::Rc;

use example_questionnaires::{REFERRAL_THRESHOLD, contact_details, onboarding, sleep_screener};
use questionnaire::{
    Advance, Content, Questionnaire, RespondentError, Retreat, ScriptedRespondent, Severity,
};

fn completion_counter() -> (Rc<Cell<u32>>, impl FnMut(&Questionnaire) + 'static) {
    let count = Rc::new(Cell::new(0));
    let seen = Rc::clone(&count);
    (count, move |_: &Questionnaire| seen.set(seen.get() + 1))
}

#[test]
fn onboarding_follows_every_routing_kind() -> anyhow::Result<()> {
    let (completions, on_complete) = completion_counter();
    let mut q = onboarding(on_complete)?;

    let path = ScriptedRespondent::new()
        .with_text("full_name", "Ada Lovelace")
        .with_text("nickname", "Ada")
        .run(&mut q)?;

    assert_eq!(path, ["welcome", "name", "nickname", "summary"]);
    assert!(q.is_complete());
    assert_eq!(completions.get(), 1);

    let rows = q.item("name")?.as_rows();
    assert_eq!(rows[0].data_id, "full_name");
    assert_eq!(rows[0].content, Some(Content::from("Ada Lovelace")));
    Ok(())
}

#[test]
fn onboarding_needs_a_name() -> anyhow::Result<()> {
    let mut q = onboarding(|_| {})?;
    let err = ScriptedRespondent::new().run(&mut q).unwrap_err();
    assert!(matches!(err, RespondentError::MissingResponse(ref id) if id == "full_name"));
    assert_eq!(q.current_item().map(|item| item.id().as_str()), Some("name"));
    Ok(())
}

#[test]
fn step_limit_stops_the_run() -> anyhow::Result<()> {
    let mut q = onboarding(|_| {})?;
    let err = ScriptedRespondent::new()
        .with_text("full_name", "Ada")
        .with_text("nickname", "Ada")
        .with_max_steps(2)
        .run(&mut q)
        .unwrap_err();
    assert!(matches!(err, RespondentError::StepLimit(2)));
    Ok(())
}

#[test]
fn high_score_ends_on_referral() -> anyhow::Result<()> {
    let mut q = sleep_screener(|_| {})?;

    let path = ScriptedRespondent::new()
        .with_choice("falling_asleep", 3)
        .with_choices("symptoms", vec![0, 1, 3])
        .with_text("symptoms_other", "Nightmares")
        .run(&mut q)?;

    assert_eq!(path, ["intro", "falling_asleep", "symptoms", "referral"]);
    let score = q.counters().get("score", None)?;
    assert_eq!(score, 7.0);
    assert!(score >= REFERRAL_THRESHOLD);

    let rows = q.item("symptoms")?.as_rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[0].content,
        Some(Content::from(r#"["Tiredness","Poor concentration","Something else"]"#))
    );
    assert_eq!(rows[1].id, "symptoms_a0_o3_a0");
    assert_eq!(rows[1].data_id, "symptoms_other");
    assert_eq!(rows[1].content, Some(Content::from("Nightmares")));
    Ok(())
}

#[test]
fn low_score_ends_on_thanks() -> anyhow::Result<()> {
    let mut q = sleep_screener(|_| {})?;

    let path = ScriptedRespondent::new()
        .with_choice("falling_asleep", 1)
        .with_choices("symptoms", vec![2])
        .run(&mut q)?;

    assert_eq!(path, ["intro", "falling_asleep", "symptoms", "thanks"]);
    assert_eq!(q.counters().get("score", None)?, 2.0);
    Ok(())
}

#[test]
fn going_back_takes_back_the_score() -> anyhow::Result<()> {
    let mut q = sleep_screener(|_| {})?;
    ScriptedRespondent::new()
        .with_choice("falling_asleep", 3)
        .with_choices("symptoms", vec![0, 1, 3])
        .run(&mut q)?;

    assert_eq!(
        q.last_q(),
        Retreat::Moved {
            from: None,
            to: "referral".into()
        }
    );
    assert_eq!(q.counters().get("score", None)?, 7.0);

    q.last_q();
    assert_eq!(q.current_item().map(|item| item.id().as_str()), Some("symptoms"));
    assert_eq!(q.counters().get("score", None)?, 3.0);

    q.respond(Vec::<usize>::new())?;
    assert_eq!(
        q.next_q()?,
        Advance::Moved {
            from: "symptoms".into(),
            to: "thanks".into()
        }
    );
    Ok(())
}

#[test]
fn contact_warning_does_not_block() -> anyhow::Result<()> {
    let (completions, on_complete) = completion_counter();
    let mut q = contact_details(on_complete)?;

    let path = ScriptedRespondent::new()
        .with_text("name", "Ada")
        .with_text("email", "ada-at-example")
        .with_number("age", 36.0)
        .run(&mut q)?;

    assert_eq!(path, ["contact", "consent"]);
    assert_eq!(completions.get(), 1);

    let issues = q.validation_issues();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].owner, "contact_a1");
    assert_eq!(issues[0].severity, Severity::Warning);

    let consent = q.item("consent")?.as_rows();
    assert_eq!(consent[0].content, Some(Content::Bool(false)));
    Ok(())
}

#[test]
fn contact_too_young_is_blocked() -> anyhow::Result<()> {
    let mut q = contact_details(|_| {})?;

    let err = ScriptedRespondent::new()
        .with_text("name", "Ada")
        .with_text("email", "ada@example.com")
        .with_number("age", 15.0)
        .run(&mut q)
        .unwrap_err();

    let RespondentError::Blocked { item, messages } = err else {
        panic!("expected a blocked run, got {err:?}");
    };
    assert_eq!(item, "contact");
    assert_eq!(messages, ["Must be greater than 17"]);
    Ok(())
}

#[test]
fn contact_going_back_clears_answers() -> anyhow::Result<()> {
    let mut q = contact_details(|_| {})?;
    q.respond_to("name", "Ada")?;
    q.respond_to("email", "ada@example.com")?;
    q.respond_to("age", 36)?;
    q.next_q()?;

    q.last_q();
    let contact = q.item("contact")?;
    assert_eq!(contact.find_answer("name")?.content(), Some(&Content::from("Ada")));

    assert_eq!(q.last_q(), Retreat::NoHistory);
    let contact = q.item("contact")?;
    assert!(contact.answers().iter().all(|answer| answer.content().is_none()));
    assert!(contact.answers().iter().all(|answer| answer.content_changed()));
    Ok(())
}

#[test]
fn long_other_symptom_is_blocked() -> anyhow::Result<()> {
    let mut q = sleep_screener(|_| {})?;

    let err = ScriptedRespondent::new()
        .with_choice("falling_asleep", 0)
        .with_choices("symptoms", vec![3])
        .with_text("symptoms_other", "x".repeat(81))
        .run(&mut q)
        .unwrap_err();

    let RespondentError::Blocked { item, messages } = err else {
        panic!("expected a blocked run, got {err:?}");
    };
    assert_eq!(item, "symptoms");
    assert_eq!(messages, ["At most 80 characters allowed (81 given)"]);
    Ok(())
}

#[test]
fn other_symptom_text_is_ignored_when_not_ticked() -> anyhow::Result<()> {
    let mut q = sleep_screener(|_| {})?;

    let path = ScriptedRespondent::new()
        .with_choice("falling_asleep", 0)
        .with_choices("symptoms", vec![0])
        .with_text("symptoms_other", "x".repeat(81))
        .run(&mut q)?;

    assert_eq!(path.last().map(|id| id.as_str()), Some("thanks"));
    Ok(())
}
