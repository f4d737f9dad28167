// Summary documents: frontmatter, title and the `##` sections that become cards.

pub mod parser;
pub mod sections;

pub use parser::{parse_summary, Summary};
pub use sections::SectionKind;
