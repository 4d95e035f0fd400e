//! Bootstrap data: the initial admin account and optional sample catalog.

use archive_core::roles::ROLE_ADMIN;
use archive_db::models::achievement::CreateAchievement;
use archive_db::models::project::CreateProject;
use archive_db::models::user::CreateUser;
use archive_db::repositories::{AchievementRepo, ProjectRepo, UserRepo};
use archive_db::DbPool;

use crate::auth::password::hash_password_blocking;
use crate::config::AdminSeedConfig;
use crate::error::AppResult;

/// What [`seed_default_admin`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminSeed {
    Created,
    /// At least one user already exists.
    AlreadyPresent,
    /// No users, but `ADMIN_PASSWORD` is unset.
    MissingPassword,
}

/// Create the default admin when the `users` table is empty.
///
/// Never touches an existing account, so restarting with a different
/// `ADMIN_PASSWORD` does not reset anyone's password.
pub async fn seed_default_admin(pool: &DbPool, seed: &AdminSeedConfig) -> AppResult<AdminSeed> {
    if UserRepo::count(pool).await? > 0 {
        return Ok(AdminSeed::AlreadyPresent);
    }
    let Some(password) = seed.password.clone() else {
        return Ok(AdminSeed::MissingPassword);
    };

    let password_hash = hash_password_blocking(password).await?;
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: seed.username.clone(),
            email: seed.email.clone(),
            password_hash,
            role: Some(ROLE_ADMIN.to_string()),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Default admin created");
    Ok(AdminSeed::Created)
}

/// Rows inserted by [`seed_samples`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SampleCounts {
    pub projects: usize,
    pub achievements: usize,
}

/// Insert demonstration projects and achievements. Each table is only filled
/// when it is empty.
pub async fn seed_samples(pool: &DbPool) -> AppResult<SampleCounts> {
    let mut counts = SampleCounts::default();

    if ProjectRepo::count(pool).await? == 0 {
        for project in sample_projects() {
            ProjectRepo::create(pool, &project).await?;
            counts.projects += 1;
        }
    }

    if AchievementRepo::count(pool).await? == 0 {
        for (title, description) in SAMPLE_ACHIEVEMENTS {
            AchievementRepo::create(
                pool,
                &CreateAchievement {
                    title: title.to_string(),
                    description: Some(description.to_string()),
                    image_filename: None,
                },
            )
            .await?;
            counts.achievements += 1;
        }
    }

    tracing::info!(
        projects = counts.projects,
        achievements = counts.achievements,
        "Sample data seeded"
    );
    Ok(counts)
}

const SAMPLE_ACHIEVEMENTS: &[(&str, &str)] = &[
    ("Best Paper Award", "Recognition for outstanding research contribution"),
    ("Academic Excellence", "Outstanding performance in engineering education"),
    ("Research Innovation", "Breakthrough research in engineering fields"),
    ("Industry Partnership", "Collaboration with leading industry partners"),
    ("Student Success", "Outstanding student achievements and recognition"),
    ("Community Impact", "Positive impact on local community development"),
];

struct SampleProject {
    title: &'static str,
    authors: &'static str,
    adviser: &'static str,
    year: i32,
    abstract_text: &'static str,
    keywords: &'static str,
    department: &'static str,
    project_type: &'static str,
    status: &'static str,
}

const SAMPLE_PROJECTS: &[SampleProject] = &[
    SampleProject {
        title: "Optimization of Manufacturing Process Using Lean Six Sigma Methodology",
        authors: "Juan Dela Cruz, Maria Santos, Pedro Garcia",
        adviser: "Dr. Ana Rodriguez",
        year: 2024,
        abstract_text: "Applies Lean Six Sigma to a local automotive parts plant to reduce waste \
             and improve quality.",
        keywords: "Lean Six Sigma, Manufacturing, Process Optimization, Quality Improvement",
        department: "IE",
        project_type: "Capstone",
        status: "completed",
    },
    SampleProject {
        title: "IoT-Based Smart Home Security System with Mobile Application",
        authors: "Carlos Mendoza, Lisa Chen, Roberto Silva",
        adviser: "Engr. Michael Torres",
        year: 2024,
        abstract_text: "Sensors and cameras integrated with a mobile app for real-time monitoring, \
             alerts and remote control.",
        keywords: "IoT, Smart Home, Security System, Mobile Application, Sensors",
        department: "CPE",
        project_type: "Design Project",
        status: "completed",
    },
    SampleProject {
        title: "Supply Chain Management System for Small and Medium Enterprises",
        authors: "Angela Reyes, Mark Johnson, Sofia Gonzales",
        adviser: "Prof. Carmen Villanueva",
        year: 2023,
        abstract_text: "A supply chain system tailored to SMEs covering inventory, suppliers and \
             operations.",
        keywords: "Supply Chain, SME, Inventory Management, Operations Research",
        department: "IE",
        project_type: "MOR",
        status: "completed",
    },
    SampleProject {
        title: "Machine Learning Approach for Predictive Maintenance in Industrial Equipment",
        authors: "David Kim, Sarah Martinez, Alex Thompson",
        adviser: "Dr. James Wilson",
        year: 2023,
        abstract_text: "Predicts equipment failures to schedule maintenance and cut downtime.",
        keywords: "Machine Learning, Predictive Maintenance, Industrial Equipment, Data Analytics",
        department: "CPE",
        project_type: "MOR",
        status: "completed",
    },
    SampleProject {
        title: "Ergonomic Assessment and Workplace Design Improvement in Manufacturing",
        authors: "Rachel Brown, Kevin Lee, Diana Morales",
        adviser: "Engr. Patricia Lim",
        year: 2023,
        abstract_text: "Ergonomic assessment of workstations with redesign recommendations backed \
             by anthropometric analysis.",
        keywords: "Ergonomics, Workplace Design, Manufacturing, Safety, Productivity",
        department: "IE",
        project_type: "Capstone",
        status: "completed",
    },
    SampleProject {
        title: "Blockchain-Based Voting System for Student Organizations",
        authors: "Miguel Santos, Jennifer Wang, Carlos Rodriguez",
        adviser: "Prof. Steven Garcia",
        year: 2024,
        abstract_text: "A tamper-evident election system for student organizations with a full \
             audit trail.",
        keywords: "Blockchain, Voting System, Security, Transparency, Cryptography",
        department: "CPE",
        project_type: "Design Project",
        status: "ongoing",
    },
];

fn sample_projects() -> Vec<CreateProject> {
    SAMPLE_PROJECTS
        .iter()
        .map(|sample| CreateProject {
            title: sample.title.to_string(),
            authors: sample.authors.to_string(),
            adviser: Some(sample.adviser.to_string()),
            year: sample.year,
            abstract_text: Some(sample.abstract_text.to_string()),
            keywords: Some(sample.keywords.to_string()),
            department: sample.department.to_string(),
            project_type: sample.project_type.to_string(),
            status: Some(sample.status.to_string()),
            pdf_filename: None,
        })
        .collect()
}
