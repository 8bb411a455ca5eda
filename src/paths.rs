use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

pub struct AppPaths {
    pub _base: PathBuf,
    pub sessions: PathBuf,
    pub data: PathBuf,
}

impl AppPaths {
    pub fn from_project_dirs() -> Option<Self> {
        ProjectDirs::from("com", "thinkboard", "ThinkBoard").map(|dirs| {
            let _base = dirs.data_dir().to_path_buf();
            let sessions = _base.join("sessions");
            let data = _base.join("data");

            Self {
                _base,
                sessions,
                data,
            }
        })
    }

    pub fn ensure_dirs_exist(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.sessions)?;
        fs::create_dir_all(&self.data)?;
        Ok(())
    }

    /// The single resumable session document.
    pub fn session_file(&self) -> PathBuf {
        self.sessions.join("current.json")
    }

    /// The user's saved section templates.
    pub fn templates_file(&self) -> PathBuf {
        self.data.join("templates.json")
    }
}
