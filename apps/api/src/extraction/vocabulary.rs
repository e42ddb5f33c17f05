//! Controlled vocabularies for skills, roles and domains.
//!
//! Vocabularies are configuration: the extractor receives one at construction
//! and never consults a global. A JSON file can override any subset of the
//! built-in sets; omitted fields keep the built-in values.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_SKILLS: &[&str] = &[
    "Python",
    "Java",
    "Machine Learning",
    "Deep Learning",
    "Data Science",
    "SQL",
    "JavaScript",
    "TypeScript",
    "AWS",
    "Azure",
    "Google Cloud",
    "React",
    "Angular",
    "Vue.js",
    "Node.js",
    "HTML",
    "CSS",
    "PHP",
    "C++",
    "Go",
    "Ruby",
    "Rust",
    "Scala",
    "Django",
    "Flask",
    "Laravel",
    "SpringBoot",
    "Hibernate",
    "JPA",
    "JSP",
    "Servlets",
    "JDBC",
    "Thymeleaf",
    "JUnit",
    "Mockito",
    "TestNG",
    "Selenium",
    "Bootstrap",
    "MySQL",
    "PostgreSQL",
    "MongoDB",
    "SQLite",
    "Firebase",
    "Oracle",
    "Cassandra",
    "Docker",
    "Kubernetes",
    "Terraform",
    "Jenkins",
    "CI/CD",
    "Git",
    "GitHub",
    "Bitbucket",
    "JIRA",
    "Confluence",
    "Natural Language Processing",
    "Computer Vision",
    "TensorFlow",
    "PyTorch",
    "Scikit-learn",
    "Keras",
    "Hugging Face",
    "LangChain",
    "Web Scraping",
    "Data Analysis",
    "Data Visualization",
    "Pandas",
    "NumPy",
    "Matplotlib",
    "Seaborn",
    "EDA",
    "Big Data",
    "Hadoop",
    "Spark",
    "Tableau",
    "Power BI",
    "Google Analytics",
    "Ethical Hacking",
    "Penetration Testing",
    "Network Security",
    "Cryptography",
    "SIEM",
    "OWASP",
    "Linux",
    "Windows Server",
    "Networking",
    "TCP/IP",
    "Bash Scripting",
    "Cloud Computing",
    "Project Management",
    "Problem-Solving",
    "Communication Skills",
    "Teamwork",
    "Leadership",
    "Time Management",
    "Critical Thinking",
    "Agile",
    "Scrum",
    "Trello",
    "Microservices",
    "REST API",
    "GraphQL",
    "Unit Testing",
    "Test Automation",
];

const DEFAULT_JOB_ROLES: &[&str] = &[
    "Software Engineer",
    "Data Scientist",
    "Machine Learning Engineer",
    "Project Manager",
    "AI Researcher",
    "Data Analyst",
    "Backend Developer",
    "Frontend Developer",
];

/// Title phrases commonly written in an "about me" summary.
const DEFAULT_ABOUT_ME_ROLES: &[&str] = &[
    "Software Engineer",
    "Data Scientist",
    "Machine Learning Engineer",
    "AI Engineer",
    "Deep Learning Engineer",
    "Data Analyst",
    "Business Analyst",
    "Backend Developer",
    "Frontend Developer",
    "Full Stack Developer",
    "Cloud Engineer",
    "DevOps Engineer",
    "Cybersecurity Analyst",
    "Embedded Systems Engineer",
    "Blockchain Developer",
    "Computer Vision Engineer",
    "NLP Engineer",
    "Product Manager",
    "QA Engineer",
    "Automation Engineer",
    "Data Engineer",
    "Database Administrator",
    "Software Architect",
    "System Administrator",
    "Game Developer",
    "Mobile App Developer",
    "AR/VR Developer",
    "Site Reliability Engineer",
    "Research Scientist",
    "Security Engineer",
    "Network Engineer",
    "Technical Program Manager",
    "MLOps Engineer",
    "Robotics Engineer",
];

const DEFAULT_DOMAINS: &[&str] = &[
    "Healthcare",
    "Finance",
    "E-commerce",
    "Education",
    "Cybersecurity",
    "Robotics",
    "Blockchain",
];

/// The sets of strings the extractor matches resume text against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub skills: BTreeSet<String>,
    pub job_roles: BTreeSet<String>,
    pub domains: BTreeSet<String>,
    pub about_me_roles: BTreeSet<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            skills: to_set(DEFAULT_SKILLS),
            job_roles: to_set(DEFAULT_JOB_ROLES),
            domains: to_set(DEFAULT_DOMAINS),
            about_me_roles: to_set(DEFAULT_ABOUT_ME_ROLES),
        }
    }
}

impl Vocabulary {
    /// Reads a vocabulary override from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read vocabulary file '{}'", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Vocabulary file '{}' is not valid JSON", path.display()))
    }

    pub fn term_count(&self) -> usize {
        self.skills.len() + self.job_roles.len() + self.domains.len() + self.about_me_roles.len()
    }
}

fn to_set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_vocabulary_is_populated() {
        let vocab = Vocabulary::default();
        assert!(vocab.skills.contains("Python"));
        assert!(vocab.job_roles.contains("Software Engineer"));
        assert!(vocab.domains.contains("Healthcare"));
        assert!(vocab.about_me_roles.contains("DevOps Engineer"));
    }

    #[test]
    fn test_partial_file_keeps_builtin_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"skills": ["Rust", "Tokio"]}}"#).unwrap();

        let vocab = Vocabulary::from_json_file(file.path()).unwrap();
        assert_eq!(vocab.skills.len(), 2);
        assert!(vocab.skills.contains("Tokio"));
        assert_eq!(vocab.domains, Vocabulary::default().domains);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(Vocabulary::from_json_file(file.path()).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = Vocabulary::from_json_file(Path::new("/nonexistent/vocab.json")).unwrap_err();
        assert!(err.to_string().contains("vocabulary file"));
    }
}
