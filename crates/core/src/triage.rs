//! Keyword triage: routes a free-text complaint to medical specialties.
//!
//! Matching is a linear scan over a fixed specialty table. A specialty matches when any of
//! its keywords is a substring of the lowercased message. Results keep table order, so the
//! first match is the primary suggestion.
//!
//! [`TriageSession`] adds the conversation pacing: every answered message reports its
//! matches. Once the scripted questions are exhausted, the next message yields a final
//! recommendation, falling back to general practice when nothing matched.

use crate::constants::{TRIAGE_FALLBACK_SPECIALTY, TRIAGE_SCRIPTED_QUESTIONS};
use serde::Serialize;

/// One row of the routing table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SpecialtyRoute {
    pub specialty: &'static str,
    pub keywords: &'static [&'static str],
    pub description: &'static str,
}

impl SpecialtyRoute {
    /// Whether any keyword occurs in `lowered` (which must already be lowercase).
    fn matches_lowered(&self, lowered: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| lowered.contains(&keyword.to_lowercase()))
    }
}

pub static SPECIALTY_ROUTES: [SpecialtyRoute; 10] = [
    SpecialtyRoute {
        specialty: "Clínico Geral",
        keywords: &[
            "gripe",
            "resfriado",
            "febre",
            "dor de cabeça",
            "mal-estar",
            "cansaço",
            "check-up",
            "exame",
            "tosse",
        ],
        description: "Atende problemas gerais de saúde e faz diagnóstico inicial",
    },
    SpecialtyRoute {
        specialty: "Cardiologista",
        keywords: &[
            "coração",
            "peito",
            "palpitação",
            "pressão alta",
            "pressão",
            "arterial",
            "colesterol",
        ],
        description: "Especialista em problemas cardiovasculares",
    },
    SpecialtyRoute {
        specialty: "Dermatologista",
        keywords: &[
            "pele", "acne", "mancha", "alergia", "coceira", "dermatite", "eczema",
        ],
        description: "Trata problemas de pele, cabelo e unhas",
    },
    SpecialtyRoute {
        specialty: "Ortopedista",
        keywords: &[
            "osso",
            "articulação",
            "dor nas costas",
            "coluna",
            "fratura",
            "entorse",
            "joelho",
            "tornozelo",
        ],
        description: "Especialista em problemas ósseos e articulares",
    },
    SpecialtyRoute {
        specialty: "Ginecologista",
        keywords: &[
            "menstruação",
            "gravidez",
            "exame ginecológico",
            "papanicolau",
            "útero",
            "ovário",
        ],
        description: "Atende à saúde da mulher",
    },
    SpecialtyRoute {
        specialty: "Pediatra",
        keywords: &["criança", "bebê", "filho", "filha", "infantil"],
        description: "Médico especializado em crianças",
    },
    SpecialtyRoute {
        specialty: "Oftalmologista",
        keywords: &["olho", "visão", "enxergar", "óculos", "vista", "catarata"],
        description: "Cuida da saúde dos olhos",
    },
    SpecialtyRoute {
        specialty: "Psiquiatra",
        keywords: &[
            "ansiedade",
            "depressão",
            "insônia",
            "transtorno",
            "mental",
            "pânico",
            "estresse",
        ],
        description: "Trata problemas de saúde mental",
    },
    SpecialtyRoute {
        specialty: "Neurologista",
        keywords: &[
            "cabeça",
            "enxaqueca",
            "convulsão",
            "desmaio",
            "tontura",
            "memória",
            "cérebro",
        ],
        description: "Especialista em sistema nervoso",
    },
    SpecialtyRoute {
        specialty: "Otorrinolaringologista",
        keywords: &[
            "ouvido", "garganta", "nariz", "sinusite", "rinite", "alergia", "audição",
        ],
        description: "Trata problemas de ouvido, nariz e garganta",
    },
];

/// Every specialty with a keyword occurring in `message`, case-insensitively, in table order.
pub fn match_specialties(message: &str) -> Vec<&'static SpecialtyRoute> {
    let lowered = message.to_lowercase();
    SPECIALTY_ROUTES
        .iter()
        .filter(|route| route.matches_lowered(&lowered))
        .collect()
}

/// Final advice at the end of a triage conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    /// The first specialty matched by the last message.
    Specialty {
        specialty: &'static str,
        description: &'static str,
    },
    /// Nothing matched; see a general practitioner.
    Fallback { specialty: &'static str },
}

impl Recommendation {
    pub fn for_matches(matches: &[&'static SpecialtyRoute]) -> Self {
        match matches.first() {
            Some(route) => Recommendation::Specialty {
                specialty: route.specialty,
                description: route.description,
            },
            None => Recommendation::Fallback {
                specialty: TRIAGE_FALLBACK_SPECIALTY,
            },
        }
    }

    pub fn specialty(&self) -> &'static str {
        match self {
            Recommendation::Specialty { specialty, .. } => *specialty,
            Recommendation::Fallback { specialty } => *specialty,
        }
    }
}

/// The assistant's response to one user message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TriageReply {
    /// Specialties matched by this message.
    pub matches: Vec<&'static SpecialtyRoute>,
    /// Index of the scripted question asked next, while questions remain.
    pub next_question: Option<usize>,
    /// Present once the scripted questions are exhausted.
    pub recommendation: Option<Recommendation>,
}

/// Conversation state for one triage chat.
#[derive(Clone, Debug, Default)]
pub struct TriageSession {
    question_index: usize,
    suggestions: Vec<&'static SpecialtyRoute>,
}

impl TriageSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the scripted question currently awaiting an answer.
    pub fn question_index(&self) -> usize {
        self.question_index
    }

    /// Matches from the most recent message.
    pub fn suggestions(&self) -> &[&'static SpecialtyRoute] {
        &self.suggestions
    }

    /// Process one user message. Blank messages are ignored and return `None`.
    pub fn respond(&mut self, message: &str) -> Option<TriageReply> {
        if message.trim().is_empty() {
            return None;
        }

        let matches = match_specialties(message);
        self.suggestions = matches.clone();

        let next = self.question_index + 1;
        let reply = if next < TRIAGE_SCRIPTED_QUESTIONS {
            self.question_index = next;
            TriageReply {
                matches,
                next_question: Some(next),
                recommendation: None,
            }
        } else {
            let recommendation = Recommendation::for_matches(&matches);
            TriageReply {
                matches,
                next_question: None,
                recommendation: Some(recommendation),
            }
        };

        tracing::debug!(
            question = self.question_index,
            matched = reply.matches.len(),
            recommended = reply.recommendation.as_ref().map(Recommendation::specialty),
            "triage message processed"
        );

        Some(reply)
    }
}

/// Stateless variant of [`TriageSession::respond`] for callers that track the turn count
/// themselves: `answered` is how many messages were already answered before this one.
pub fn triage_turn(message: &str, answered: usize) -> TriageReply {
    let mut session = TriageSession {
        question_index: answered.min(TRIAGE_SCRIPTED_QUESTIONS - 1),
        suggestions: Vec::new(),
    };
    session.respond(message).unwrap_or(TriageReply {
        matches: Vec::new(),
        next_question: Some(session.question_index),
        recommendation: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(matches: &[&'static SpecialtyRoute]) -> Vec<&'static str> {
        matches.iter().map(|r| r.specialty).collect()
    }

    #[test]
    fn matches_case_insensitively() {
        let matches = match_specialties("Estou com FEBRE e tosse");
        assert_eq!(names(&matches), vec!["Clínico Geral"]);
    }

    #[test]
    fn matches_are_in_table_order_and_can_overlap() {
        // "dor de cabeça" hits general practice, "cabeça" neurology.
        let matches = match_specialties("dor de cabeça e alergia");
        assert_eq!(
            names(&matches),
            vec![
                "Clínico Geral",
                "Dermatologista",
                "Neurologista",
                "Otorrinolaringologista"
            ]
        );
    }

    #[test]
    fn substring_matching_hits_inside_words() {
        // "exame" is contained in "exames"; "osso" in "nosso".
        let matches = match_specialties("Preciso de exames para o nosso filho");
        assert_eq!(
            names(&matches),
            vec!["Clínico Geral", "Ortopedista", "Pediatra"]
        );
    }

    #[test]
    fn accented_uppercase_is_lowered() {
        let matches = match_specialties("PRESSÃO no PEITO");
        assert_eq!(names(&matches), vec!["Cardiologista"]);
    }

    #[test]
    fn no_keywords_no_matches() {
        assert!(match_specialties("bom dia").is_empty());
        assert!(match_specialties("").is_empty());
    }

    #[test]
    fn matches_equal_brute_force_definition() {
        let messages = [
            "tenho insônia e ansiedade",
            "meu joelho dói depois da fratura",
            "visão embaçada, uso óculos",
            "sinusite e rinite",
            "nada a declarar",
        ];
        for message in messages {
            let lowered = message.to_lowercase();
            let expected: Vec<&str> = SPECIALTY_ROUTES
                .iter()
                .filter(|r| r.keywords.iter().any(|k| lowered.contains(&k.to_lowercase())))
                .map(|r| r.specialty)
                .collect();
            assert_eq!(names(&match_specialties(message)), expected, "{message}");
        }
    }

    #[test]
    fn session_recommends_first_match_after_scripted_questions() {
        let mut session = TriageSession::new();
        for expected_next in 1..TRIAGE_SCRIPTED_QUESTIONS {
            let reply = session.respond("resposta").expect("non-blank");
            assert_eq!(reply.next_question, Some(expected_next));
            assert!(reply.recommendation.is_none());
        }

        let reply = session.respond("palpitação e dor no peito").expect("non-blank");
        assert_eq!(reply.next_question, None);
        assert_eq!(
            reply.recommendation,
            Some(Recommendation::Specialty {
                specialty: "Cardiologista",
                description: "Especialista em problemas cardiovasculares",
            })
        );
    }

    #[test]
    fn session_falls_back_to_general_practice() {
        let mut session = TriageSession::new();
        let mut last = None;
        for _ in 0..TRIAGE_SCRIPTED_QUESTIONS {
            last = session.respond("não sei dizer");
        }
        let reply = last.expect("non-blank");
        assert_eq!(
            reply.recommendation,
            Some(Recommendation::Fallback {
                specialty: "Clínico Geral"
            })
        );
    }

    #[test]
    fn blank_messages_do_not_advance() {
        let mut session = TriageSession::new();
        assert!(session.respond("   ").is_none());
        assert_eq!(session.question_index(), 0);
        session.respond("febre").unwrap();
        assert_eq!(session.question_index(), 1);
        assert_eq!(names(session.suggestions()), vec!["Clínico Geral"]);
    }

    #[test]
    fn stateless_turn_matches_session() {
        let reply = triage_turn("acne", 0);
        assert_eq!(reply.next_question, Some(1));
        assert_eq!(names(&reply.matches), vec!["Dermatologista"]);

        let last = triage_turn("acne", TRIAGE_SCRIPTED_QUESTIONS - 1);
        assert_eq!(last.recommendation.map(|r| r.specialty()), Some("Dermatologista"));

        let beyond = triage_turn("acne", 50);
        assert!(beyond.recommendation.is_some());
    }

    #[test]
    fn specialty_names_are_unique() {
        let mut names: Vec<&str> = SPECIALTY_ROUTES.iter().map(|r| r.specialty).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SPECIALTY_ROUTES.len());
    }
}
