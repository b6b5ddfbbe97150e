use serde::{Deserialize, Serialize};

/// Static biography content shown on the profile screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub tagline: String,
    pub links: Vec<ProfileLink>,
    pub about: Vec<String>,
    pub projects: Vec<Project>,
    pub publications: Vec<Publication>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileLink {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub title: String,
    pub journal: String,
    pub year: u16,
}

impl Publication {
    /// "Journal, Year" line shown under the title
    pub fn citation(&self) -> String {
        format!("{}, {}", self.journal, self.year)
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "Franklin Ramos".to_string(),
            tagline: "Biomedical Engineer | Backend Developer | Data Scientist".to_string(),
            links: vec![
                ProfileLink {
                    label: "GitHub".to_string(),
                    url: "https://github.com/franklinramos".to_string(),
                },
                ProfileLink {
                    label: "LinkedIn".to_string(),
                    url: "https://www.linkedin.com/in/franklinramos".to_string(),
                },
                ProfileLink {
                    label: "Email".to_string(),
                    url: "mailto:franklin@example.com".to_string(),
                },
            ],
            about: vec![
                "As a backend developer and data scientist with a background in biomedical \
                 engineering, I specialize in creating robust server-side applications and \
                 deriving insights from complex datasets. My expertise lies in Python, where I \
                 leverage its powerful ecosystem for both web development and data analysis."
                    .to_string(),
                "With a strong foundation in scientific computing and machine learning, I excel \
                 at developing scalable solutions for data-intensive problems. My work often \
                 involves designing efficient APIs, implementing machine learning models, and \
                 creating data pipelines that transform raw information into actionable insights."
                    .to_string(),
            ],
            projects: vec![
                Project {
                    title: "Quantum Entanglement Simulator".to_string(),
                    description: "A web-based simulator for quantum entanglement experiments."
                        .to_string(),
                    link: "https://github.com/franklinramos/quantum-simulator".to_string(),
                },
                Project {
                    title: "Neural Network Visualizer".to_string(),
                    description: "Interactive tool for visualizing neural network architectures \
                                  and data flow."
                        .to_string(),
                    link: "https://github.com/franklinramos/nn-visualizer".to_string(),
                },
                Project {
                    title: "Climate Change Data Analysis".to_string(),
                    description: "Python-based analysis of global climate data using machine \
                                  learning techniques."
                        .to_string(),
                    link: "https://github.com/franklinramos/climate-analysis".to_string(),
                },
            ],
            publications: vec![
                Publication {
                    title: "Advancements in Quantum Computing".to_string(),
                    journal: "Nature Quantum Information".to_string(),
                    year: 2023,
                },
                Publication {
                    title: "Machine Learning in Climate Science".to_string(),
                    journal: "Journal of Climate".to_string(),
                    year: 2022,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_has_content_for_every_section() {
        let profile = Profile::default();
        assert!(!profile.name.is_empty());
        assert_eq!(profile.about.len(), 2);
        assert_eq!(profile.projects.len(), 3);
        assert_eq!(profile.publications.len(), 2);
    }

    #[test]
    fn citation_joins_journal_and_year() {
        let publication = Publication {
            title: "T".to_string(),
            journal: "Journal of Climate".to_string(),
            year: 2022,
        };
        assert_eq!(publication.citation(), "Journal of Climate, 2022");
    }
}
