use crate::catalog::themes::Theme;
use crate::model::{LocalizedText, Question, QuestionError, QuestionId, QuestionKind, Subject};

/// Source of question sets for a `(week, theme, subject)` triple.
pub trait QuestionBank: Send + Sync {
    /// Ordered questions for one session.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the underlying content is malformed.
    fn questions(
        &self,
        week: u32,
        theme: &Theme,
        subject: Subject,
    ) -> Result<Vec<Question>, QuestionError>;
}

#[derive(Clone, Copy)]
enum SeedKind {
    Choice(&'static [&'static str]),
    Input,
    YesNo,
}

struct Seed {
    prompt: (&'static str, &'static str),
    kind: SeedKind,
    answer: &'static str,
    explanation: (&'static str, &'static str),
}

const READING: &[Seed] = &[
    Seed {
        prompt: (
            "What does the word 'magnificent' mean?",
            "Was bedeutet das Wort 'magnificent'?",
        ),
        kind: SeedKind::Choice(&["Very large", "Very beautiful or impressive", "Very small", "Very fast"]),
        answer: "Very beautiful or impressive",
        explanation: (
            "Magnificent means extremely beautiful, elaborate, or impressive.",
            "Magnificent bedeutet äußerst schön, aufwendig oder beeindruckend.",
        ),
    },
    Seed {
        prompt: (
            "In the sentence 'The cat sat on the mat', what is the subject?",
            "In dem Satz 'The cat sat on the mat', was ist das Subjekt?",
        ),
        kind: SeedKind::Choice(&["cat", "sat", "mat", "on"]),
        answer: "cat",
        explanation: (
            "The subject is who or what the sentence is about - in this case, the cat.",
            "Das Subjekt ist, worum es in dem Satz geht - in diesem Fall die Katze.",
        ),
    },
    Seed {
        prompt: ("Which word rhymes with 'bright'?", "Welches Wort reimt sich auf 'bright'?"),
        kind: SeedKind::Choice(&["night", "bread", "brown", "blue"]),
        answer: "night",
        explanation: (
            "Night and bright both end with the same '-ight' sound.",
            "Night und bright enden beide mit dem gleichen '-ight' Klang.",
        ),
    },
    Seed {
        prompt: ("What is a synonym for 'happy'?", "Was ist ein Synonym für 'happy'?"),
        kind: SeedKind::Choice(&["sad", "joyful", "angry", "tired"]),
        answer: "joyful",
        explanation: (
            "Joyful means the same thing as happy - feeling pleasure or contentment.",
            "Joyful bedeutet dasselbe wie happy - Freude oder Zufriedenheit empfinden.",
        ),
    },
    Seed {
        prompt: (
            "Complete the sentence: 'The _____ was very loud.' (thunder/quite)",
            "Vervollständige den Satz: 'The _____ was very loud.' (thunder/quite)",
        ),
        kind: SeedKind::Input,
        answer: "thunder",
        explanation: (
            "Thunder makes sense in this context as something that can be loud.",
            "Thunder ergibt in diesem Kontext Sinn, da es etwas ist, das laut sein kann.",
        ),
    },
];

const SPELLING: &[Seed] = &[
    Seed {
        prompt: (
            "Spell the word that means 'very beautiful': m____i____nt",
            "Buchstabiere das Wort, das 'sehr schön' bedeutet: m____i____nt",
        ),
        kind: SeedKind::Input,
        answer: "magnificent",
        explanation: (
            "The correct spelling is m-a-g-n-i-f-i-c-e-n-t.",
            "Die richtige Schreibweise ist m-a-g-n-i-f-i-c-e-n-t.",
        ),
    },
    Seed {
        prompt: ("Which spelling is correct?", "Welche Schreibweise ist richtig?"),
        kind: SeedKind::Choice(&["recieve", "receive", "receve", "receave"]),
        answer: "receive",
        explanation: (
            "Remember the rule: 'i before e except after c' - but receive is an exception!",
            "Denk an die Regel: 'i vor e außer nach c' - aber receive ist eine Ausnahme!",
        ),
    },
    Seed {
        prompt: ("Spell the plural of 'child':", "Buchstabiere die Mehrzahl von 'child':"),
        kind: SeedKind::Input,
        answer: "children",
        explanation: (
            "The plural of child is children, not 'childs'.",
            "Die Mehrzahl von child ist children, nicht 'childs'.",
        ),
    },
    Seed {
        prompt: ("Which word is spelled correctly?", "Welches Wort ist richtig geschrieben?"),
        kind: SeedKind::Choice(&["seperate", "separate", "seperete", "separete"]),
        answer: "separate",
        explanation: (
            "The correct spelling is s-e-p-a-r-a-t-e.",
            "Die richtige Schreibweise ist s-e-p-a-r-a-t-e.",
        ),
    },
    Seed {
        prompt: (
            "Spell the word meaning 'to make better': i____ove",
            "Buchstabiere das Wort für 'verbessern': i____ove",
        ),
        kind: SeedKind::Input,
        answer: "improve",
        explanation: (
            "The correct spelling is i-m-p-r-o-v-e.",
            "Die richtige Schreibweise ist i-m-p-r-o-v-e.",
        ),
    },
];

const GRAMMAR: &[Seed] = &[
    Seed {
        prompt: (
            "Which sentence uses the correct verb tense?",
            "Welcher Satz verwendet die richtige Zeitform?",
        ),
        kind: SeedKind::Choice(&[
            "She will went to the store tomorrow",
            "She will go to the store tomorrow",
            "She will going to the store tomorrow",
            "She will goes to the store tomorrow",
        ]),
        answer: "She will go to the store tomorrow",
        explanation: (
            "With 'will', we use the base form of the verb (go), not past tense or other forms.",
            "Mit 'will' verwenden wir die Grundform des Verbs (go), nicht die Vergangenheit oder andere Formen.",
        ),
    },
    Seed {
        prompt: (
            "What type of word is 'quickly' in this sentence: 'She ran quickly'?",
            "Was für eine Wortart ist 'quickly' in diesem Satz: 'She ran quickly'?",
        ),
        kind: SeedKind::Choice(&["noun", "verb", "adjective", "adverb"]),
        answer: "adverb",
        explanation: (
            "Quickly describes HOW she ran, making it an adverb that modifies the verb 'ran'.",
            "Quickly beschreibt WIE sie rannte und ist daher ein Adverb, das das Verb 'ran' modifiziert.",
        ),
    },
    Seed {
        prompt: ("Which sentence is in passive voice?", "Welcher Satz steht im Passiv?"),
        kind: SeedKind::Choice(&[
            "The dog chased the ball",
            "The ball was chased by the dog",
            "The dog is chasing the ball",
            "The dog will chase the ball",
        ]),
        answer: "The ball was chased by the dog",
        explanation: (
            "In passive voice, the subject receives the action rather than performing it.",
            "Im Passiv erhält das Subjekt die Handlung, anstatt sie auszuführen.",
        ),
    },
    Seed {
        prompt: (
            "Choose the correct pronoun: 'Between you and ___, I think this is great.'",
            "Wähle das richtige Pronomen: 'Between you and ___, I think this is great.'",
        ),
        kind: SeedKind::Choice(&["I", "me", "myself", "mine"]),
        answer: "me",
        explanation: (
            "After prepositions like 'between', we use object pronouns (me), not subject pronouns (I).",
            "Nach Präpositionen wie 'between' verwenden wir Objektpronomen (me), nicht Subjektpronomen (I).",
        ),
    },
    Seed {
        prompt: (
            "Is this sentence correct? 'There are less people today than yesterday.'",
            "Ist dieser Satz richtig? 'There are less people today than yesterday.'",
        ),
        kind: SeedKind::YesNo,
        answer: "No",
        explanation: (
            "It should be 'fewer people' because people are countable. Use 'less' for uncountable things.",
            "Es sollte 'fewer people' heißen, weil Menschen zählbar sind. Verwende 'less' für unzählbare Dinge.",
        ),
    },
];

const MATH: &[Seed] = &[
    Seed {
        prompt: ("What is 247 + 189?", "Was ist 247 + 189?"),
        kind: SeedKind::Input,
        answer: "436",
        explanation: (
            "247 + 189 = 436. Add the ones: 7+9=16 (carry 1), tens: 4+8+1=13 (carry 1), hundreds: 2+1+1=4.",
            "247 + 189 = 436. Einer: 7+9=16 (1 übertragen), Zehner: 4+8+1=13 (1 übertragen), Hunderter: 2+1+1=4.",
        ),
    },
    Seed {
        prompt: (
            "If a rectangle has a length of 8 cm and width of 5 cm, what is its area?",
            "Wenn ein Rechteck eine Länge von 8 cm und eine Breite von 5 cm hat, wie groß ist seine Fläche?",
        ),
        kind: SeedKind::Choice(&["13 cm²", "26 cm²", "40 cm²", "80 cm²"]),
        answer: "40 cm²",
        explanation: (
            "Area of rectangle = length × width = 8 × 5 = 40 cm²",
            "Fläche des Rechtecks = Länge × Breite = 8 × 5 = 40 cm²",
        ),
    },
    Seed {
        prompt: ("What is 3/4 + 1/4?", "Was ist 3/4 + 1/4?"),
        kind: SeedKind::Choice(&["4/8", "4/4", "1", "Both 4/4 and 1"]),
        answer: "Both 4/4 and 1",
        explanation: (
            "3/4 + 1/4 = 4/4 = 1. Both answers represent the same value.",
            "3/4 + 1/4 = 4/4 = 1. Beide Antworten stellen den gleichen Wert dar.",
        ),
    },
    Seed {
        prompt: (
            "Round 2,847 to the nearest hundred:",
            "Runde 2.847 auf die nächste Hunderterstelle:",
        ),
        kind: SeedKind::Input,
        answer: "2800",
        explanation: (
            "Look at the tens digit (4). Since 4 < 5, round down: 2,847 → 2,800",
            "Schaue auf die Zehnerstelle (4). Da 4 < 5 ist, runde ab: 2.847 → 2.800",
        ),
    },
    Seed {
        prompt: (
            "A pizza is cut into 8 equal pieces. If you eat 3 pieces, what fraction of the pizza did you eat?",
            "Eine Pizza wird in 8 gleiche Stücke geschnitten. Wenn du 3 Stücke isst, welchen Bruchteil der Pizza hast du gegessen?",
        ),
        kind: SeedKind::Choice(&["3/8", "5/8", "3/5", "8/3"]),
        answer: "3/8",
        explanation: (
            "You ate 3 pieces out of 8 total pieces, so 3/8 of the pizza.",
            "Du hast 3 Stücke von insgesamt 8 Stücken gegessen, also 3/8 der Pizza.",
        ),
    },
];

fn seeds_for(subject: Subject) -> &'static [Seed] {
    match subject {
        Subject::Reading => READING,
        Subject::Spelling => SPELLING,
        Subject::Grammar => GRAMMAR,
        Subject::Math => MATH,
    }
}

fn build(position: usize, seed: &Seed) -> Result<Question, QuestionError> {
    let id = QuestionId::new(u32::try_from(position + 1).unwrap_or(u32::MAX));
    let kind = match seed.kind {
        SeedKind::Choice(options) => QuestionKind::multiple_choice(options.iter().copied()),
        SeedKind::Input => QuestionKind::FreeInput,
        SeedKind::YesNo => QuestionKind::TrueFalse,
    };
    Question::new(
        id,
        LocalizedText::both(seed.prompt.0, seed.prompt.1),
        kind,
        seed.answer,
        Some(LocalizedText::both(seed.explanation.0, seed.explanation.1)),
    )
}

/// Reference content: five questions per subject, identical every week.
///
/// Some themes personalise prompt wording; answers never change.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinQuestionBank;

impl BuiltinQuestionBank {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl QuestionBank for BuiltinQuestionBank {
    fn questions(
        &self,
        _week: u32,
        theme: &Theme,
        subject: Subject,
    ) -> Result<Vec<Question>, QuestionError> {
        let mut questions = seeds_for(subject)
            .iter()
            .enumerate()
            .map(|(position, seed)| build(position, seed))
            .collect::<Result<Vec<_>, _>>()?;

        if theme.id == "taylor-swift" && subject == Subject::Reading {
            questions = questions
                .into_iter()
                .map(|q| {
                    let en = q.prompt().en().replace("magnificent", "sparkling");
                    let de = q.prompt().de().map(|de| de.replace("magnificent", "funkelnd"));
                    q.with_prompt(LocalizedText::new(en, de))
                })
                .collect();
        }

        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{THEMES, theme_by_id};
    use crate::model::Locale;

    #[test]
    fn every_subject_has_five_valid_questions() {
        let bank = BuiltinQuestionBank::new();
        for theme in &THEMES {
            for subject in Subject::ALL {
                let questions = bank.questions(1, theme, subject).unwrap();
                assert_eq!(questions.len(), 5, "{subject} / {}", theme.id);
                assert_eq!(questions[0].id(), QuestionId::new(1));
            }
        }
    }

    #[test]
    fn taylor_swift_theme_personalises_reading_prompts() {
        let bank = BuiltinQuestionBank::new();
        let theme = theme_by_id("taylor-swift").unwrap();
        let questions = bank.questions(1, theme, Subject::Reading).unwrap();
        assert_eq!(
            questions[0].prompt_in(Locale::En),
            "What does the word 'sparkling' mean?"
        );
        assert_eq!(
            questions[0].prompt_in(Locale::De),
            "Was bedeutet das Wort 'funkelnd'?"
        );
        assert_eq!(questions[0].correct_answer(), "Very beautiful or impressive");

        let other = theme_by_id("ocean-depths").unwrap();
        let plain = bank.questions(1, other, Subject::Reading).unwrap();
        assert_eq!(
            plain[0].prompt_in(Locale::En),
            "What does the word 'magnificent' mean?"
        );
    }

    #[test]
    fn grammar_ends_with_true_false() {
        let bank = BuiltinQuestionBank::new();
        let questions = bank.questions(3, &THEMES[2], Subject::Grammar).unwrap();
        let last = questions.last().unwrap();
        assert_eq!(last.kind(), &QuestionKind::TrueFalse);
        assert!(last.is_correct("no"));
    }
}
