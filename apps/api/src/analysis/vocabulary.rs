//! Fixed vocabularies for keyword extraction.

/// Skill keywords recognised in job descriptions and resumes.
/// Matching is case-insensitive substring containment.
pub const SKILLS: &[&str] = &[
    "JavaScript",
    "TypeScript",
    "React",
    "Vue",
    "Angular",
    "Node.js",
    "Express",
    "HTML",
    "CSS",
    "Python",
    "Java",
    "C#",
    "PHP",
    "Ruby",
    "SQL",
    "NoSQL",
    "MongoDB",
    "PostgreSQL",
    "MySQL",
    "AWS",
    "Azure",
    "GCP",
    "Docker",
    "Kubernetes",
];

/// Job-title phrases recognised as a candidate's position.
pub const POSITIONS: &[&str] = &[
    "Software Engineer",
    "Web Developer",
    "Frontend Developer",
    "Backend Developer",
    "Full Stack Developer",
    "UI/UX Designer",
    "Data Scientist",
    "DevOps Engineer",
    "Product Manager",
];

pub const UNNAMED_CANDIDATE: &str = "Unnamed Candidate";
pub const UNSPECIFIED_POSITION: &str = "Unspecified Position";
