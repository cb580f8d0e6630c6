//! # Academy Search Core
//!
//! I/O-free logic for answering natural-language questions about a
//! curriculum: data models, vocabulary tables, index construction, text
//! normalization, fuzzy ranking, and the query resolver.
//!
//! The crate does no filesystem or network access. Callers load a
//! [`models::Corpus`] (and optionally a [`vocabulary::Vocabulary`]) and hand
//! them to a [`resolver::QueryResolver`].
//!
//! ```
//! use academy_search_core::models::Corpus;
//! use academy_search_core::resolver::QueryResolver;
//! use academy_search_core::vocabulary::Vocabulary;
//!
//! let corpus = Corpus::from_json(r#"{
//!     "modules": [{
//!         "id": "module-01", "number": "01", "title": "The Environment",
//!         "subtitle": "Setup", "objective": "Install tools", "duration": "40 min",
//!         "sections": []
//!     }]
//! }"#).unwrap();
//! let mut resolver: QueryResolver = QueryResolver::new(corpus, Vocabulary::default());
//! let result = resolver.parse_query("module 1").unwrap();
//! assert_eq!(result.title, "📚 The Environment");
//! ```

pub mod fuzzy;
pub mod history;
pub mod index;
pub mod levenshtein;
pub mod models;
pub mod normalize;
pub mod phrases;
pub mod resolver;
pub mod result;
pub mod vocabulary;
