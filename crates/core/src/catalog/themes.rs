use crate::model::Locale;

/// A weekly theme. Only the fields the engine and reports need are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
    motivational_en: &'static str,
    motivational_de: &'static str,
}

impl Theme {
    #[must_use]
    pub fn motivational(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => self.motivational_en,
            Locale::De => self.motivational_de,
        }
    }
}

pub const THEMES: [Theme; 6] = [
    Theme {
        id: "taylor-swift",
        name: "Taylor Swift Era",
        emoji: "✨",
        motivational_en: "You belong with the smart kids! Great job!",
        motivational_de: "Du gehörst zu den klugen Kindern! Gut gemacht!",
    },
    Theme {
        id: "kpop-demon",
        name: "K-Pop Demon Hunter",
        emoji: "🎵",
        motivational_en: "You're the main character of your learning story!",
        motivational_de: "Du bist die Hauptfigur deiner Lerngeschichte!",
    },
    Theme {
        id: "labubu-forest",
        name: "Labubu Forest",
        emoji: "🌲",
        motivational_en: "Like a wise forest creature, you're growing smarter every day!",
        motivational_de: "Wie ein weises Waldwesen wirst du jeden Tag klüger!",
    },
    Theme {
        id: "space-adventure",
        name: "Space Adventure",
        emoji: "🚀",
        motivational_en: "You're reaching for the stars and landing among them!",
        motivational_de: "Du greifst nach den Sternen und landest zwischen ihnen!",
    },
    Theme {
        id: "ocean-depths",
        name: "Ocean Depths",
        emoji: "🌊",
        motivational_en: "Like a brave deep-sea explorer, you're discovering amazing things!",
        motivational_de: "Wie ein mutiger Tiefseeforscher entdeckst du erstaunliche Dinge!",
    },
    Theme {
        id: "magical-castle",
        name: "Magical Castle",
        emoji: "🏰",
        motivational_en: "Your magical powers of learning grow stronger with each quest!",
        motivational_de: "Deine magischen Lernkräfte werden mit jeder Quest stärker!",
    },
];

/// Themes rotate weekly; week 1 is the first theme. Week 0 is treated as week 1.
#[must_use]
pub fn theme_for_week(week: u32) -> &'static Theme {
    let index = week.saturating_sub(1) as usize % THEMES.len();
    &THEMES[index]
}

#[must_use]
pub fn theme_by_id(id: &str) -> Option<&'static Theme> {
    THEMES.iter().find(|theme| theme.id == id)
}
