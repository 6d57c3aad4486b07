//! A scored screener: option scores accumulate in the `score` counter and
//! decide whether the run ends with a referral.

use questionnaire::{
    AllAnswered, Answer, AnswerOption, AnswerType, Content, CounterSet, Item, MaxLength,
    Questionnaire, Result,
};

/// Scores at or above this end the screener on the referral item.
pub const REFERRAL_THRESHOLD: f64 = 6.0;

fn scored(label: &str, score: i32) -> Result<AnswerOption> {
    AnswerOption::labelled(label).try_with_extra("score", score)
}

/// The `score` extra of an option, or 0 when it has none.
pub fn option_score(option: &AnswerOption) -> f64 {
    option
        .extras()
        .get("score")
        .and_then(Content::as_number)
        .unwrap_or(0.0)
}

/// Adds the score of the picked option.
fn add_selected_score(
    answer: Option<&Answer>,
    _: &Item,
    _: &Questionnaire,
    counters: &mut CounterSet,
) -> Result<()> {
    let score = answer
        .and_then(Answer::selected_option)
        .map(option_score)
        .unwrap_or(0.0);
    counters.increment("score", score, None)
}

/// Adds the score of every ticked option.
fn add_ticked_scores(
    answer: Option<&Answer>,
    _: &Item,
    _: &Questionnaire,
    counters: &mut CounterSet,
) -> Result<()> {
    let score: f64 = answer
        .map(|answer| answer.selected_options().into_iter().map(option_score).sum())
        .unwrap_or(0.0);
    counters.increment("score", score, None)
}

pub fn sleep_screener(
    on_complete: impl FnMut(&Questionnaire) + 'static,
) -> anyhow::Result<Questionnaire> {
    let items = vec![
        Item::new("intro", "A few questions about your sleep over the last two weeks.")?,
        Item::new("falling_asleep", "How often did you have trouble falling asleep?")?
            .with_answer(
                Answer::new(AnswerType::Radio)
                    .with_data_id("falling_asleep")
                    .with_options([
                        scored("Never", 0)?,
                        scored("Some nights", 1)?,
                        scored("Most nights", 2)?,
                        scored("Every night", 3)?,
                    ]),
            )
            .with_rule(AllAnswered)
            .with_process_answer(add_selected_score),
        Item::new("symptoms", "Which of these did you notice during the day?")?
            .with_answer(
                Answer::new(AnswerType::Checkbox)
                    .with_data_id("symptoms")
                    .with_options([
                        scored("Tiredness", 1)?,
                        scored("Poor concentration", 2)?,
                        scored("Irritability", 1)?,
                        scored("Something else", 1)?.with_extra_answer(
                            Answer::new(AnswerType::Text)
                                .with_data_id("symptoms_other")
                                .with_rule(MaxLength(80)),
                        ),
                    ]),
            )
            .with_process_answer(add_ticked_scores)
            .with_next_item_fn(|_, _, q| {
                let score = q.counters().get("score", Some(0.0))?;
                let next = if score >= REFERRAL_THRESHOLD {
                    "referral"
                } else {
                    "thanks"
                };
                Ok(Some(next.to_string()))
            }),
        Item::new("thanks", "Thank you. Your answers don't suggest a sleep problem.")?.ending(),
        Item::new("referral", "Thank you. We recommend talking to your doctor.")?.ending(),
    ];

    Ok(Questionnaire::new(items, on_complete)?
        .with_name("Sleep screener")
        .with_citation("Internal pilot, 2024")
        .with_version("2"))
}
