use std::path::PathBuf;

use clap::Parser;
use jobcheck_core::FormField;

use crate::config::DEFAULT_CONFIG_PATH;

#[derive(Parser, Debug)]
#[command(
    name = "jobcheck",
    version,
    about = "Submit job postings to the fake-job prediction dashboard"
)]
pub struct Cli {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH, help = "RON config file")]
    pub config: PathBuf,
    #[arg(long, help = "Override the prediction form action URL")]
    pub action_url: Option<String>,
    #[arg(long, value_name = "TEXT", help = "Submit one posting and exit on its result")]
    pub once: Option<String>,
    #[arg(long, help = "Also log to the terminal, at debug level")]
    pub verbose: bool,
    #[arg(long, help = "Job title sent with every posting")]
    pub job_title: Option<String>,
    #[arg(long, help = "Salary range sent with every posting")]
    pub salary_range: Option<String>,
    #[arg(long, help = "Company profile sent with every posting")]
    pub company_profile: Option<String>,
    #[arg(long, help = "Requirements sent with every posting")]
    pub requirements: Option<String>,
}

impl Cli {
    /// Structured form fields given on the command line, in form order.
    pub fn form_fields(&self) -> Vec<(FormField, String)> {
        [
            (FormField::JobTitle, &self.job_title),
            (FormField::SalaryRange, &self.salary_range),
            (FormField::CompanyProfile, &self.company_profile),
            (FormField::Requirements, &self.requirements),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.clone().map(|value| (field, value)))
        .collect()
    }
}
