use color_print::ceprintln;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Error(String),
    Warn(String),
    Note(String),
    Cause(String),
}

impl Msg {
    pub fn print(&self) {
        match self {
            Msg::Error(msg) => ceprintln!("<red,bold>error</>: {}", msg),
            Msg::Warn(msg) => ceprintln!("<yellow,bold>warn</>: {}", msg),
            Msg::Note(msg) => ceprintln!("<green,bold>note</>: {}", msg),
            Msg::Cause(msg) => ceprintln!("     <blue>caused by</>: {}", msg),
        }
    }
}
