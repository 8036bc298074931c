//! Where icons come from.
//!
//! - Remote: an ordered list of candidate URLs per identifier, fetched over
//!   HTTP by an [`IconFetcher`]
//! - Executable: the icon embedded in the running process' executable, or an
//!   image file shipped next to it, found by an [`ExecutableIconSource`]

use crate::types::{IconError, IconSourceError};
use crate::window_tracker::normalize_process_name;
use async_trait::async_trait;
use reqwest::Url;
use std::path::{Path, PathBuf};
use std::time::Duration;
use sysinfo::{ProcessRefreshKind, System, UpdateKind};
use tracing::{debug, trace};

/// Browser-like User-Agent; some CDNs refuse requests without one
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Requested favicon edge length for the favicon service
pub const DEFAULT_FAVICON_SIZE: u32 = 128;

/// Brand names, favicon-service domain, direct icon URL
type Brand = (&'static [&'static str], &'static str, &'static str);

/// Brand identifiers in match order
const BRAND_ICONS: &[Brand] = &[
    (&["youtube"], "youtube.com", "https://www.youtube.com/favicon.ico"),
    (&["spotify"], "spotify.com", "https://www.spotify.com/favicon.ico"),
    (
        &["discord"],
        "discord.com",
        "https://discord.com/assets/07dca80a102d4149e9736d4b162cff6f.ico",
    ),
    (&["netflix"], "netflix.com", "https://www.netflix.com/favicon.ico"),
    (&["twitch"], "twitch.tv", "https://www.twitch.tv/favicon.ico"),
    (
        &["soundcloud"],
        "soundcloud.com",
        "https://a-v2.sndcdn.com/assets/images/sc-icons/favicon-2cadd14bdb.ico",
    ),
    (
        &["chrome"],
        "google.com",
        "https://www.google.com/chrome/static/images/favicons/favicon-96x96.png",
    ),
    (
        &["firefox"],
        "mozilla.org",
        "https://www.mozilla.org/media/img/favicons/firefox/browser/favicon-196x196.png",
    ),
    (
        &["edge", "msedge"],
        "microsoft.com",
        "https://www.microsoft.com/favicon.ico",
    ),
    (
        &["vscode", "code"],
        "code.visualstudio.com",
        "https://code.visualstudio.com/favicon.ico",
    ),
];

/// Linux icon theme directories, largest first
const SYSTEM_ICON_DIRS: [&str; 5] = [
    "/usr/share/icons/hicolor/256x256/apps",
    "/usr/share/icons/hicolor/128x128/apps",
    "/usr/share/icons/hicolor/64x64/apps",
    "/usr/share/icons/hicolor/48x48/apps",
    "/usr/share/pixmaps",
];

fn favicon_service(domain: &str, size: u32) -> String {
    format!(
        "https://www.google.com/s2/favicons?domain={}&sz={}",
        domain, size
    )
}

/// Ordered remote candidates for an identifier, without duplicates.
///
/// Identifiers containing a brand name try the favicon service and the
/// brand's own icon URL, first brand in table order wins. Other
/// `http(s)://` identifiers try the host's well-known icon paths. Anything
/// else that is not a URL also tries the favicon service for
/// `<identifier>.com`.
pub fn candidate_urls(identifier: &str, favicon_size: u32) -> Vec<String> {
    let id = identifier.trim().to_lowercase();
    let is_url = id.starts_with("http://") || id.starts_with("https://");
    let mut urls = Vec::new();

    if let Some((_, domain, direct)) = brand_for(&id) {
        urls.push(favicon_service(domain, favicon_size));
        urls.push(direct.to_string());
    } else if is_url {
        return url_candidates(&id, favicon_size).unwrap_or_default();
    }

    if !is_url && !id.is_empty() {
        urls.push(favicon_service(&format!("{}.com", id), favicon_size));
    }

    dedup(urls)
}

fn brand_for(id: &str) -> Option<&'static Brand> {
    BRAND_ICONS
        .iter()
        .find(|(names, _, _)| names.iter().any(|name| id.contains(name)))
}

fn url_candidates(identifier: &str, favicon_size: u32) -> Option<Vec<String>> {
    let url = Url::parse(identifier).ok()?;
    let host = url.host_str()?;
    let origin = format!("{}://{}", url.scheme(), host);

    Some(dedup(vec![
        favicon_service(host, favicon_size),
        format!("{}/favicon.ico", origin),
        format!("https://icons.duckduckgo.com/ip3/{}.ico", host),
        format!("{}/apple-touch-icon.png", origin),
        format!("{}/apple-touch-icon-precomposed.png", origin),
    ]))
}

fn dedup(urls: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(urls.len());
    for url in urls {
        if !unique.contains(&url) {
            unique.push(url);
        }
    }
    unique
}

/// Fetch raw bytes for one candidate URL
#[async_trait]
pub trait IconFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, IconSourceError>;
}

/// `reqwest`-backed fetcher
pub struct HttpIconFetcher {
    client: reqwest::Client,
}

impl HttpIconFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, IconError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| IconError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl IconFetcher for HttpIconFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, IconSourceError> {
        trace!("GET {}", url);

        let request_error = |e: reqwest::Error| {
            if e.is_timeout() {
                IconSourceError::Timeout {
                    url: url.to_string(),
                }
            } else {
                IconSourceError::Request {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        };

        let response = self.client.get(url).send().await.map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(IconSourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(request_error)?;
        if body.is_empty() {
            return Err(IconSourceError::EmptyBody {
                url: url.to_string(),
            });
        }

        Ok(body.to_vec())
    }
}

/// Icon associated with a running process' executable.
///
/// Implementations may block on the filesystem; the resolver calls them from
/// a blocking task.
pub trait ExecutableIconSource: Send + Sync {
    fn icon_bytes(&self, process_name: &str) -> Option<Vec<u8>>;
}

#[cfg(target_os = "windows")]
mod embedded {
    use image::{ImageFormat, RgbaImage};
    use std::ffi::c_void;
    use std::io::Cursor;
    use std::mem::size_of;
    use std::path::Path;
    use windows::core::HSTRING;
    use windows::Win32::Foundation::HWND;
    use windows::Win32::Graphics::Gdi::{
        DeleteObject, GetDC, GetDIBits, GetObjectW, ReleaseDC, BITMAP, BITMAPINFO,
        BITMAPINFOHEADER, BI_RGB, DIB_RGB_COLORS, HBITMAP, HDC,
    };
    use windows::Win32::UI::Shell::ExtractIconExW;
    use windows::Win32::UI::WindowsAndMessaging::{DestroyIcon, GetIconInfo, HICON, ICONINFO};

    /// Pixel rows of a bitmap as top-down 32-bit BGRA
    struct Pixels {
        width: u32,
        height: u32,
        bgra: Vec<u8>,
    }

    /// Large icon embedded in the executable, encoded as PNG
    pub fn icon_png(executable: &Path) -> Option<Vec<u8>> {
        let path = HSTRING::from(executable);
        let mut large = HICON::default();

        unsafe {
            if ExtractIconExW(&path, 0, Some(&mut large), None, 1) == 0 || large.is_invalid() {
                return None;
            }
            let image = icon_image(large);
            let _ = DestroyIcon(large);

            let mut png = Vec::new();
            image?
                .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
                .ok()?;
            Some(png)
        }
    }

    unsafe fn icon_image(icon: HICON) -> Option<RgbaImage> {
        let mut info = ICONINFO::default();
        GetIconInfo(icon, &mut info).ok()?;

        let hdc = GetDC(HWND::default());
        let color = read_bitmap(hdc, info.hbmColor);
        let mask = read_bitmap(hdc, info.hbmMask);
        ReleaseDC(HWND::default(), hdc);

        for bitmap in [info.hbmColor, info.hbmMask] {
            if !bitmap.is_invalid() {
                let _ = DeleteObject(bitmap);
            }
        }

        let Pixels {
            width,
            height,
            bgra: mut pixels,
        } = color?;

        for pixel in pixels.chunks_exact_mut(4) {
            pixel.swap(0, 2);
        }

        // Icons without an alpha channel take their opacity from the AND mask
        if pixels.chunks_exact(4).all(|pixel| pixel[3] == 0) {
            let mask = mask.filter(|m| m.width == width && m.height == height);
            for (index, pixel) in pixels.chunks_exact_mut(4).enumerate() {
                let transparent = mask
                    .as_ref()
                    .and_then(|m| m.bgra.get(index * 4))
                    .is_some_and(|value| *value != 0);
                pixel[3] = if transparent { 0 } else { 255 };
            }
        }

        RgbaImage::from_raw(width, height, pixels)
    }

    unsafe fn read_bitmap(hdc: HDC, bitmap: HBITMAP) -> Option<Pixels> {
        if bitmap.is_invalid() {
            return None;
        }

        let mut header = BITMAP::default();
        let written = GetObjectW(
            bitmap,
            size_of::<BITMAP>() as i32,
            Some(&mut header as *mut BITMAP as *mut c_void),
        );
        if written == 0 {
            return None;
        }

        let width = u32::try_from(header.bmWidth).ok().filter(|w| *w > 0)?;
        let height = u32::try_from(header.bmHeight).ok().filter(|h| *h > 0)?;

        let mut info = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: header.bmWidth,
                // negative height requests top-down rows
                biHeight: -header.bmHeight,
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB.0,
                ..Default::default()
            },
            ..Default::default()
        };

        let mut bgra = vec![0u8; width as usize * height as usize * 4];
        let lines = GetDIBits(
            hdc,
            bitmap,
            0,
            height,
            Some(bgra.as_mut_ptr() as *mut c_void),
            &mut info,
            DIB_RGB_COLORS,
        );
        if lines == 0 {
            return None;
        }

        Some(Pixels {
            width,
            height,
            bgra,
        })
    }
}

#[cfg(not(target_os = "windows"))]
mod embedded {
    use std::path::Path;

    pub fn icon_png(_executable: &Path) -> Option<Vec<u8>> {
        None
    }
}

/// Looks up the executable through `sysinfo` and reads the icon embedded in
/// it (Windows), else an image file shipped beside it or installed in the
/// system icon theme
#[derive(Debug, Clone, Default)]
pub struct SystemExecutableIcons {
    /// Extra directories searched before the system ones
    extra_dirs: Vec<PathBuf>,
}

impl SystemExecutableIcons {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.extra_dirs.push(dir.into());
        self
    }

    /// Path of the first running executable whose name matches `process_name`
    fn find_executable(process_name: &str) -> Option<PathBuf> {
        let mut system = System::new();
        system.refresh_processes_specifics(
            ProcessRefreshKind::new().with_exe(UpdateKind::OnlyIfNotSet),
        );

        system
            .processes()
            .values()
            .filter(|process| normalize_process_name(process.name()) == process_name)
            .find_map(|process| process.exe().map(Path::to_path_buf))
    }

    /// Candidate image files for a process, in lookup order
    fn candidate_files(&self, process_name: &str, executable: Option<&Path>) -> Vec<PathBuf> {
        let stem = executable
            .and_then(|exe| exe.file_stem())
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| process_name.to_string());

        let mut files = Vec::new();
        if let Some(dir) = executable.and_then(Path::parent) {
            files.push(dir.join(format!("{}.png", stem)));
            files.push(dir.join(format!("{}.ico", stem)));
        }
        for dir in &self.extra_dirs {
            files.push(dir.join(format!("{}.png", stem)));
            files.push(dir.join(format!("{}.ico", stem)));
        }
        for dir in SYSTEM_ICON_DIRS {
            files.push(Path::new(dir).join(format!("{}.png", stem)));
        }
        files
    }
}

impl ExecutableIconSource for SystemExecutableIcons {
    fn icon_bytes(&self, process_name: &str) -> Option<Vec<u8>> {
        let executable = Self::find_executable(process_name);
        match executable.as_deref() {
            Some(exe) => {
                if let Some(png) = embedded::icon_png(exe) {
                    debug!("Using icon embedded in {:?} for {}", exe, process_name);
                    return Some(png);
                }
            }
            None => trace!("No running executable found for {}", process_name),
        }

        self.candidate_files(process_name, executable.as_deref())
            .into_iter()
            .find_map(|path| match std::fs::read(&path) {
                Ok(bytes) if !bytes.is_empty() => {
                    debug!("Using executable icon {:?} for {}", path, process_name);
                    Some(bytes)
                }
                _ => None,
            })
    }
}
