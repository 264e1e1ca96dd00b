//! Personality survey scoring.
//!
//! Five Likert items (1-5). Items 2 and 4 are reverse-scored. Totals of 18
//! and above classify as extrovert, 10 and below as introvert, anything in
//! between as neutral.

use crate::{ClubMatchError, PersonalityTrait, Result};

/// Survey prompts, in answer order.
pub const SURVEY_QUESTIONS: [&str; 5] = [
    "나는 새로운 사람들을 만나는 것을 즐긴다.",
    "나는 대규모 모임보다는 소규모 모임을 선호한다.",
    "나는 대화의 중심에 있는 것을 좋아한다.",
    "나는 혼자 시간을 보내며 재충전한다.",
    "나는 즉흥적인 계획을 세우는 것을 좋아한다.",
];

const EXTROVERT_MIN: u32 = 18;
const INTROVERT_MAX: u32 = 10;

/// Zero-based indices of reverse-scored items.
const REVERSED: [usize; 2] = [1, 3];

/// Classify a personality trait from survey answers.
///
/// # Example
/// ```
/// use clubmatch::{classify_personality, PersonalityTrait};
///
/// assert_eq!(classify_personality(&[3, 3, 3, 3, 3]).unwrap(), PersonalityTrait::Neutral);
/// assert_eq!(classify_personality(&[5, 1, 5, 1, 5]).unwrap(), PersonalityTrait::Extrovert);
/// ```
pub fn classify_personality(answers: &[u8]) -> Result<PersonalityTrait> {
    if answers.len() != SURVEY_QUESTIONS.len() {
        return Err(ClubMatchError::InvalidSurvey {
            expected: SURVEY_QUESTIONS.len(),
            got: answers.len(),
        });
    }
    if let Some(&value) = answers.iter().find(|&&a| !(1..=5).contains(&a)) {
        return Err(ClubMatchError::InvalidSurveyAnswer { value });
    }

    let total: u32 = answers
        .iter()
        .enumerate()
        .map(|(i, &a)| {
            if REVERSED.contains(&i) {
                6 - u32::from(a)
            } else {
                u32::from(a)
            }
        })
        .sum();

    Ok(if total >= EXTROVERT_MIN {
        PersonalityTrait::Extrovert
    } else if total <= INTROVERT_MAX {
        PersonalityTrait::Introvert
    } else {
        PersonalityTrait::Neutral
    })
}
