//! File classification by name suffix.

/// Broad class of a file, inferred from its name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileClass {
    Text,
    Acrobat,
    Ebook,
    Doc,
    Picture,
    Video,
    Audio,
    Exe,
    Code,
    Archive,
}

impl FileClass {
    /// Classify by suffix, case-insensitively.
    ///
    /// Backup names (`notes.txt~`, `notes.txt.1`, `#notes.txt#`) fall back
    /// to the preceding suffix.
    pub fn from_name(name: &str) -> Option<Self> {
        lookup_by_suffix(name, Self::from_suffix)
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "txt" => Some(Self::Text),
            "pdf" => Some(Self::Acrobat),
            "mobi" | "epub" | "azw" => Some(Self::Ebook),
            "doc" | "docx" => Some(Self::Doc),
            "png" | "jpg" | "jpeg" | "gif" | "ico" | "svg" | "ps" | "eps" => Some(Self::Picture),
            "mov" | "mpg" | "mpeg" | "avi" | "wmv" => Some(Self::Video),
            "mp3" | "m4a" | "m4p" | "ogg" | "flac" | "aiff" | "au" | "pcm" | "wav" | "aac"
            | "wma" => Some(Self::Audio),
            "exe" | "o" => Some(Self::Exe),
            "c" | "sh" | "py" | "pl" | "tcl" | "bat" | "js" | "css" | "html" | "htm" | "xml"
            | "php" => Some(Self::Code),
            "zip" | "jar" | "tgz" | "tjz" | "tar" => Some(Self::Archive),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Acrobat => "acrobat",
            Self::Ebook => "ebook",
            Self::Doc => "doc",
            Self::Picture => "picture",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Exe => "exe",
            Self::Code => "code",
            Self::Archive => "archive",
        }
    }

    /// Icon name used for list items of this class.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Text | Self::Acrobat => "text",
            Self::Ebook => "ebook",
            Self::Doc => "doc",
            Self::Picture => "picture",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Exe | Self::Code | Self::Archive => "file",
        }
    }
}

/// Brief human description of a file's type; empty when nothing is known.
pub fn describe_file_by_name(name: &str) -> &'static str {
    lookup_by_suffix(name, describe_suffix).unwrap_or("")
}

/// Icon name for a file; empty when the class is unknown.
pub fn icon_name_by_file_name(name: &str) -> &'static str {
    FileClass::from_name(name).map_or("", FileClass::icon)
}

fn describe_suffix(suffix: &str) -> Option<&'static str> {
    let description = match suffix {
        "txt" => "Text",
        "pdf" => "Adobe PDF",
        "doc" => "MS Word",
        "docx" => "MS Word (Open XML)",
        "xls" => "MS Excel",
        "ppt" => "MS Powerpoint",
        "png" | "jpg" | "jpeg" | "gif" => "Image",
        "ico" => "MS Icon",
        "svg" => "Structured Vector Graphics",
        "ps" => "PostScript",
        "eps" => "Extended PostScript",
        "avi" | "mpg" | "mpeg" | "mov" => "Video",
        "wmv" => "Windows Media Video",
        "mp3" => "MPEG Audio",
        "ogg" => "Ogg Vorbis Audio",
        "wav" => "Waveform Audio",
        "wma" => "Windows Media Audio",
        "exe" => "Executable",
        "o" => "Linkable Object Code",
        "c" => "C Source Code",
        "sh" => "Shell Script",
        "py" => "Python Script",
        "pl" => "Perl Script",
        "tcl" => "TCL Script",
        "js" => "Javascript",
        "bat" => "MS Batch Script",
        "zip" => "Compressed Archive (zip)",
        "gz" => "Compressed (gzip)",
        "tgz" => "Compressed Archive (gzip)",
        "jar" => "Java Archive",
        "htm" | "html" => "HyperText",
        "php" => "PHP HyperText",
        "xml" => "Extensible Markup Language",
        "db" => "Database",
        "dat" => "Data",
        _ => return None,
    };
    Some(description)
}

fn lookup_by_suffix<T>(name: &str, table: impl Fn(&str) -> Option<T>) -> Option<T> {
    let parts: Vec<&str> = name.split('.').collect();
    let suffix = parts[parts.len() - 1];
    if let Some(found) = table(&suffix.to_lowercase()) {
        return Some(found);
    }
    let is_backup = suffix.chars().any(|c| c.is_ascii_digit() || c == '~' || c == '#');
    if parts.len() > 2 && is_backup {
        return table(&parts[parts.len() - 2].to_lowercase());
    }
    None
}
