//! Preset passages and localized labels.
//!
//! Scripture is quoted from public domain translations: the King James
//! Version for English and the Reina-Valera 1909 for Spanish.

use serde::{Deserialize, Serialize};

/// Passages longer than this are accepted with a warning
pub const SOFT_PASSAGE_BUDGET: usize = 600;
/// Passages longer than this are rejected
pub const HARD_PASSAGE_BUDGET: usize = 850;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
}

impl Language {
    /// Parse a language tag such as `en`, `es-MX` or `ES`. Unknown tags are
    /// [None].
    pub fn from_tag(tag: &str) -> Option<Language> {
        let primary = tag.split(['-', '_']).next()?.trim().to_ascii_lowercase();
        match primary.as_str() {
            "en" => Some(Language::En),
            "es" => Some(Language::Es),
            _ => None,
        }
    }

    pub fn labels(self) -> &'static Labels {
        match self {
            Language::En => &EN_LABELS,
            Language::Es => &ES_LABELS,
        }
    }

    pub fn passages(self) -> &'static [Passage] {
        match self {
            Language::En => EN_PASSAGES,
            Language::Es => ES_PASSAGES,
        }
    }

    /// The preset at `index`, or [None] if there is no such preset
    pub fn passage(self, index: usize) -> Option<&'static Passage> {
        self.passages().get(index)
    }
}

/// Fixed text printed on every product
#[derive(Debug, PartialEq, Eq)]
pub struct Labels {
    pub in_loving_memory: &'static str,
    pub sunrise: &'static str,
    pub sunset: &'static str,
}

static EN_LABELS: Labels = Labels {
    in_loving_memory: "In Loving Memory",
    sunrise: "SUNRISE",
    sunset: "SUNSET",
};

static ES_LABELS: Labels = Labels {
    in_loving_memory: "En Amorosa Memoria",
    sunrise: "AMANECER",
    sunset: "ATARDECER",
};

#[derive(Debug, PartialEq, Eq)]
pub struct Passage {
    pub title: &'static str,
    pub text: &'static str,
}

static EN_PASSAGES: &[Passage] = &[
    Passage {
        title: "Psalm 23",
        text: "The LORD is my shepherd; I shall not want. He maketh me to lie down in green \
               pastures: he leadeth me beside the still waters. He restoreth my soul: he \
               leadeth me in the paths of righteousness for his name's sake. Yea, though I \
               walk through the valley of the shadow of death, I will fear no evil: for thou \
               art with me; thy rod and thy staff they comfort me. Thou preparest a table \
               before me in the presence of mine enemies: thou anointest my head with oil; \
               my cup runneth over. Surely goodness and mercy shall follow me all the days \
               of my life: and I will dwell in the house of the LORD for ever.",
    },
    Passage {
        title: "John 14:1-3",
        text: "Let not your heart be troubled: ye believe in God, believe also in me. In my \
               Father's house are many mansions: if it were not so, I would have told you. \
               I go to prepare a place for you. And if I go and prepare a place for you, I \
               will come again, and receive you unto myself; that where I am, there ye may \
               be also.",
    },
    Passage {
        title: "Ecclesiastes 3:1-4",
        text: "To every thing there is a season, and a time to every purpose under the \
               heaven: A time to be born, and a time to die; a time to plant, and a time to \
               pluck up that which is planted; A time to kill, and a time to heal; a time \
               to break down, and a time to build up; A time to weep, and a time to laugh; \
               a time to mourn, and a time to dance.",
    },
    Passage {
        title: "Revelation 21:4",
        text: "And God shall wipe away all tears from their eyes; and there shall be no \
               more death, neither sorrow, nor crying, neither shall there be any more \
               pain: for the former things are passed away.",
    },
];

static ES_PASSAGES: &[Passage] = &[
    Passage {
        title: "Salmo 23",
        text: "Jehová es mi pastor; nada me faltará. En lugares de delicados pastos me hará \
               yacer: Junto á aguas de reposo me pastoreará. Confortará mi alma; Guiaráme \
               por sendas de justicia por amor de su nombre. Aunque ande en valle de sombra \
               de muerte, No temeré mal alguno; porque tú estarás conmigo: Tu vara y tu \
               cayado me infundirán aliento. Aderezarás mesa delante de mí, en presencia de \
               mis angustiadores: Ungiste mi cabeza con aceite: mi copa está rebosando. \
               Ciertamente el bien y la misericordia me seguirán todos los días de mi vida: \
               Y en la casa de Jehová moraré por largos días.",
    },
    Passage {
        title: "Juan 14:1-3",
        text: "No se turbe vuestro corazón; creéis en Dios, creed también en mí. En la casa \
               de mi Padre muchas moradas hay: de otra manera os lo hubiera dicho: voy, \
               pues, á preparar lugar para vosotros. Y si me fuere, y os aparejare lugar, \
               vendré otra vez, y os tomaré á mí mismo: para que donde yo estoy, vosotros \
               también estéis.",
    },
    Passage {
        title: "Eclesiastés 3:1-4",
        text: "Para todas las cosas hay sazón, y todo lo que se quiere debajo del cielo, \
               tiene su tiempo. Tiempo de nacer, y tiempo de morir; tiempo de plantar, y \
               tiempo de arrancar lo plantado; Tiempo de matar, y tiempo de curar; tiempo \
               de destruir, y tiempo de edificar; Tiempo de llorar, y tiempo de reir; \
               tiempo de endechar, y tiempo de bailar.",
    },
    Passage {
        title: "Apocalipsis 21:4",
        text: "Y limpiará Dios toda lágrima de los ojos de ellos; y la muerte no será más; \
               y no habrá más llanto, ni clamor, ni dolor: porque las primeras cosas son \
               pasadas.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_language_tags() {
        assert_eq!(Language::from_tag("en"), Some(Language::En));
        assert_eq!(Language::from_tag("es-MX"), Some(Language::Es));
        assert_eq!(Language::from_tag("ES"), Some(Language::Es));
        assert_eq!(Language::from_tag("fr"), None);
        assert_eq!(Language::from_tag(""), None);
    }

    #[test]
    fn presets_fit_the_hard_budget() {
        for language in [Language::En, Language::Es] {
            assert_eq!(language.passages().len(), 4);
            for passage in language.passages() {
                let chars = passage.text.chars().count();
                assert!(chars <= HARD_PASSAGE_BUDGET, "{} is {chars} chars", passage.title);
                assert!(!passage.text.contains("  "));
            }
        }
    }

    #[test]
    fn languages_have_matching_presets() {
        assert_eq!(Language::En.passage(0).map(|p| p.title), Some("Psalm 23"));
        assert_eq!(Language::Es.passage(0).map(|p| p.title), Some("Salmo 23"));
        assert!(Language::En.passage(4).is_none());
        assert_eq!(Language::Es.labels().sunrise, "AMANECER");
    }
}
