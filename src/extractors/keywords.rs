// src/extractors/keywords.rs
//! Keyword terms used by the page classifier, the curriculum table router and
//! the reintegration triggers. A term is satisfied when any of its spellings
//! occurs in lower-cased text; documents mix English and Portuguese wording.

pub type Term = &'static [&'static str];

/// True when `text` (already lower-cased) contains any spelling of `term`.
pub fn has(text: &str, term: Term) -> bool {
    term.iter().any(|spelling| text.contains(spelling))
}

/// True when every term is present.
pub fn has_all(text: &str, terms: &[Term]) -> bool {
    terms.iter().all(|term| has(text, term))
}

// --- Page-level markers ---
pub const PEDAGOGICAL_PROJECT: Term = &["pedagogical project", "projeto pedagógico"];
pub const CURRICULUM_MATRIX: Term = &["curriculum matrix", "matriz curricular"];
pub const FACULTY_BODY: Term = &["faculty body", "corpo docente"];
pub const WORK_REGIME: Term = &["workload regime", "work regime", "regime de trabalho"];
pub const SYLLABUS_LABEL: Term = &["syllabus:", "ementa:"];
pub const BASIC_BIBLIOGRAPHY: Term = &["basic bibliography:", "bibliografia básica:"];
pub const ELECTIVE_DISCIPLINES: Term = &["elective disciplines", "disciplinas optativas"];
pub const COMPUTER_SCIENCE: Term = &["computer science", "ciência da computação"];
pub const MONDAY: Term = &["monday", "segunda"];
pub const TUESDAY: Term = &["tuesday", "terça"];
pub const WEDNESDAY: Term = &["wednesday", "quarta"];
pub const ACADEMIC_CALENDAR: Term = &["academic calendar", "calendário acadêmico"];
pub const STATUTE_HISTORY: Term = &[
    "change history of the statute",
    "histórico de alterações do estatuto",
];
pub const COUNCIL_RESOLUTION: Term = &["council resolution", "resolução do conselho"];

// --- Reintegration-only markers ---
pub const CHANGE_HISTORY: Term = &["change history", "histórico de alterações"];
pub const RESOLUTION: Term = &["resolution", "resolução"];

// --- Curriculum table markers ---
pub const DISCIPLINE: Term = &["discipline", "disciplina"];
pub const DISCIPLINE_LABEL: Term = &["discipline:", "disciplina:"];
pub const WEEKLY_WORKLOAD: Term = &["weekly workload", "ch semanal"];
pub const PREREQUISITES: Term = &[
    "pré – requisitos",
    "pré- requisitos",
    "pré-requisitos",
    "pre-requisites",
    "prerequisites",
];
pub const SPECIAL_TOPICS: Term = &["special topics", "tópicos especiais"];
pub const GEOMETRIC_ALGORITHMS: Term = &["geometric algorithms", "algoritmos geométricos"];
pub const PROFESSOR_NAME: Term = &["professor name", "nome do professor"];
pub const TRAINING: Term = &["training", "formação"];
pub const MASTERS_DEGREE_IN: Term = &["master's degree in", "mestrado em"];
pub const CURRICULAR_COMPONENTS: Term = &["curricular components", "componentes curriculares"];
pub const MATRIX_2015: Term = &["matrix 2015", "matriz 2015"];
pub const PERIOD: Term = &["período", "periodo", "period"];
pub const TOTAL: Term = &["total"];

// --- Schedule header markers ---
pub const WEEKDAYS: Term = &[
    "segunda", "terça", "quarta", "quinta", "sexta", "monday", "tuesday", "wednesday",
    "thursday", "friday",
];
