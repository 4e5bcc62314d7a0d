// Task prompts
pub const PROMPT_TASK_DESCRIPTION: &str = "Description";
pub const PROMPT_TASK_PROJECT: &str = "Project";
pub const PROMPT_TASK_EXTERNAL_ID: &str = "Issue ID";
pub const PROMPT_TASK_START: &str = "Start (HH:MM)";
pub const PROMPT_TASK_END: &str = "End (HH:MM, empty keeps it)";

// Redmine prompts
pub const PROMPT_REDMINE_URL: &str = "Enter the Redmine URL";
pub const PROMPT_REDMINE_TOKEN: &str = "Enter your Redmine API key";
pub const PROMPT_REDMINE_DEFAULT_ACTIVITY: &str = "Enter the default activity ID (0 for none)";

// Work hours prompts
pub const PROMPT_WORK_HOURS: &str = "Hours per weekday, Monday first";

// Sync prompts
pub const PROMPT_SELECT_ACTIVITY: &str = "Select activity";

// General prompts
pub const PROMPT_RETRY: &str = "Retry";
pub const PROMPT_QUIT: &str = "Quit";
pub const PROMPT_CONTINUE: &str = "Press Enter to continue";
