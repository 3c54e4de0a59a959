use kanban_board::Notice;
use serde::Serialize;

#[derive(Serialize)]
pub struct NoticeOutput {
    pub severity: &'static str,
    pub message: String,
}

impl From<&Notice> for NoticeOutput {
    fn from(notice: &Notice) -> Self {
        Self {
            severity: notice.severity().as_str(),
            message: notice.message(),
        }
    }
}

#[derive(Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    pub api_version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<NoticeOutput>,
}

#[derive(Serialize)]
pub struct ListResponse<T: Serialize> {
    pub items: Vec<T>,
    pub count: usize,
}

fn notices_output(notices: &[Notice]) -> Vec<NoticeOutput> {
    notices.iter().map(NoticeOutput::from).collect()
}

pub fn output_success<T: Serialize>(data: T, notices: &[Notice]) -> anyhow::Result<()> {
    let response = CliResponse {
        success: true,
        api_version: env!("CARGO_PKG_VERSION"),
        data: Some(data),
        error: None,
        notices: notices_output(notices),
    };
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

pub fn output_list<T: Serialize>(items: Vec<T>, notices: &[Notice]) -> anyhow::Result<()> {
    let count = items.len();
    output_success(ListResponse { items, count }, notices)
}

/// Print an error envelope to stderr and exit with status 1.
pub fn output_error(message: &str, notices: &[Notice]) -> ! {
    let response: CliResponse<()> = CliResponse {
        success: false,
        api_version: env!("CARGO_PKG_VERSION"),
        data: None,
        error: Some(message.to_string()),
        notices: notices_output(notices),
    };
    match serde_json::to_string(&response) {
        Ok(json) => eprintln!("{}", json),
        Err(_) => eprintln!("error: {}", message),
    }
    std::process::exit(1);
}
