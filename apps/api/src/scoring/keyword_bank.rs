//! Keyword bank: static `domain → topic → keywords` dictionaries that help
//! callers pick `expected_keywords`, plus evaluation presets built on them.
//!
//! Read-only; nothing here is mutated at runtime.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::Serialize;

use crate::scoring::weights::ScoringWeights;

pub type Topic = (&'static str, &'static [&'static str]);

pub const KEYWORD_DICTIONARY: &[(&str, &[Topic])] = &[
    (
        "software_engineering",
        &[
            (
                "oop_concepts",
                &[
                    "encapsulation", "inheritance", "polymorphism", "abstraction", "class",
                    "object", "interface", "method", "constructor", "destructor", "getter",
                    "setter", "private", "public", "protected",
                ],
            ),
            (
                "design_patterns",
                &[
                    "singleton", "factory", "observer", "strategy", "decorator", "adapter",
                    "facade", "proxy", "builder", "prototype", "mvc", "mvvm", "repository",
                    "dependency injection",
                ],
            ),
            (
                "data_structures",
                &[
                    "array", "linked list", "stack", "queue", "tree", "graph", "hash table",
                    "heap", "binary tree", "b-tree", "trie", "set", "map", "dictionary",
                    "priority queue",
                ],
            ),
            (
                "algorithms",
                &[
                    "sorting", "searching", "dynamic programming", "recursion", "big o",
                    "time complexity", "space complexity", "greedy", "divide and conquer",
                    "backtracking", "bfs", "dfs",
                ],
            ),
            (
                "databases",
                &[
                    "sql", "nosql", "normalization", "index", "query", "join", "primary key",
                    "foreign key", "acid", "transaction", "mongodb", "postgresql", "mysql",
                    "redis",
                ],
            ),
            (
                "web_development",
                &[
                    "html", "css", "javascript", "react", "angular", "vue", "rest", "api",
                    "http", "https", "authentication", "frontend", "backend", "full stack",
                    "responsive",
                ],
            ),
            (
                "devops",
                &[
                    "docker", "kubernetes", "ci/cd", "jenkins", "git", "deployment", "container",
                    "microservices", "cloud", "aws", "azure", "gcp", "terraform", "ansible",
                ],
            ),
        ],
    ),
    (
        "data_science",
        &[
            (
                "ml_fundamentals",
                &[
                    "supervised learning", "unsupervised learning", "classification",
                    "regression", "clustering", "feature engineering", "training", "testing",
                    "validation", "cross validation", "overfitting", "underfitting", "bias",
                    "variance", "hyperparameter",
                ],
            ),
            (
                "algorithms_ml",
                &[
                    "linear regression", "logistic regression", "decision tree",
                    "random forest", "svm", "knn", "naive bayes", "neural network",
                    "deep learning", "gradient descent", "backpropagation",
                ],
            ),
            (
                "deep_learning",
                &[
                    "cnn", "rnn", "lstm", "transformer", "attention", "bert", "gpt", "encoder",
                    "decoder", "embedding", "activation", "dropout", "batch normalization",
                    "convolution", "pooling",
                ],
            ),
            (
                "tools_frameworks",
                &[
                    "python", "tensorflow", "pytorch", "keras", "scikit-learn", "pandas",
                    "numpy", "matplotlib", "jupyter", "spark",
                ],
            ),
            (
                "nlp",
                &[
                    "tokenization", "stemming", "lemmatization", "word embedding",
                    "sentiment analysis", "named entity", "pos tagging", "text classification",
                    "language model", "transformer",
                ],
            ),
            (
                "statistics",
                &[
                    "mean", "median", "mode", "standard deviation", "variance", "correlation",
                    "hypothesis testing", "p-value", "confidence interval", "probability",
                    "distribution", "normal distribution",
                ],
            ),
        ],
    ),
    (
        "behavioral",
        &[
            (
                "leadership",
                &[
                    "team", "leadership", "delegation", "motivation", "mentoring",
                    "decision making", "conflict resolution", "collaboration", "communication",
                    "initiative", "responsibility",
                ],
            ),
            (
                "problem_solving",
                &[
                    "analyze", "approach", "solution", "challenge", "obstacle", "creative",
                    "critical thinking", "troubleshoot", "debug", "root cause", "systematic",
                    "methodology",
                ],
            ),
            (
                "teamwork",
                &[
                    "collaborate", "team player", "support", "contribute", "coordination",
                    "feedback", "consensus", "diverse", "stakeholder", "cross-functional",
                ],
            ),
            (
                "communication",
                &[
                    "explain", "present", "document", "clarify", "listen", "articulate",
                    "concise", "clear", "technical writing", "audience",
                    "stakeholder communication",
                ],
            ),
            (
                "adaptability",
                &[
                    "flexible", "adapt", "change", "learn", "growth mindset", "resilience",
                    "pivot", "agile", "evolving", "new technology",
                ],
            ),
        ],
    ),
    (
        "project_management",
        &[
            (
                "methodologies",
                &[
                    "agile", "scrum", "kanban", "waterfall", "sprint", "iteration", "ceremony",
                    "standup", "retrospective", "planning", "estimation", "velocity",
                ],
            ),
            (
                "tools_processes",
                &[
                    "jira", "confluence", "trello", "roadmap", "backlog", "epic", "user story",
                    "acceptance criteria", "milestone", "deliverable", "timeline", "gantt",
                ],
            ),
            (
                "skills",
                &[
                    "stakeholder", "requirement", "scope", "risk management", "budget",
                    "resource allocation", "prioritization", "negotiation", "status report",
                    "escalation",
                ],
            ),
        ],
    ),
];

fn domain_topics(domain: &str) -> Option<&'static [Topic]> {
    KEYWORD_DICTIONARY
        .iter()
        .find(|(name, _)| *name == domain)
        .map(|(_, topics)| *topics)
}

pub fn domains() -> Vec<&'static str> {
    KEYWORD_DICTIONARY.iter().map(|(name, _)| *name).collect()
}

pub fn topics(domain: &str) -> Option<Vec<&'static str>> {
    domain_topics(domain).map(|topics| topics.iter().map(|(name, _)| *name).collect())
}

pub fn keywords_for_topic(domain: &str, topic: &str) -> Option<&'static [&'static str]> {
    domain_topics(domain)?
        .iter()
        .find(|(name, _)| *name == topic)
        .map(|(_, keywords)| *keywords)
}

/// Every keyword across a domain's topics, deduplicated and sorted.
pub fn all_keywords_for_domain(domain: &str) -> Option<Vec<&'static str>> {
    let topics = domain_topics(domain)?;
    let unique: BTreeSet<&'static str> = topics
        .iter()
        .flat_map(|(_, keywords)| keywords.iter().copied())
        .collect();
    Some(unique.into_iter().collect())
}

// ────────────────────────────────────────────────────────────────────────────
// Presets
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationPreset {
    TechnicalPython,
    DataScience,
    Behavioral,
    QuickScreening,
}

#[derive(Debug, Clone, Serialize)]
pub struct PresetConfig {
    pub name: &'static str,
    pub weights: ScoringWeights,
    pub keywords: Vec<&'static str>,
}

impl EvaluationPreset {
    pub const ALL: [EvaluationPreset; 4] = [
        EvaluationPreset::TechnicalPython,
        EvaluationPreset::DataScience,
        EvaluationPreset::Behavioral,
        EvaluationPreset::QuickScreening,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EvaluationPreset::TechnicalPython => "technical_python",
            EvaluationPreset::DataScience => "data_science",
            EvaluationPreset::Behavioral => "behavioral",
            EvaluationPreset::QuickScreening => "quick_screening",
        }
    }

    pub fn config(self) -> PresetConfig {
        let (weights, domain) = match self {
            EvaluationPreset::TechnicalPython => {
                (ScoringWeights::TECHNICAL, Some("software_engineering"))
            }
            EvaluationPreset::DataScience => (ScoringWeights::TECHNICAL, Some("data_science")),
            EvaluationPreset::Behavioral => (ScoringWeights::BEHAVIORAL, Some("behavioral")),
            EvaluationPreset::QuickScreening => (ScoringWeights::BALANCED, None),
        };

        PresetConfig {
            name: self.name(),
            weights,
            keywords: domain
                .and_then(all_keywords_for_domain)
                .unwrap_or_default(),
        }
    }
}

impl FromStr for EvaluationPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EvaluationPreset::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| format!("unknown preset '{s}'"))
    }
}
