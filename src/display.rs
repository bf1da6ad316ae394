use crate::config::Playlist;
use log::info;
use prettytable::{Cell, Row, Table};

pub fn display(playlists: &Vec<Playlist>) {
    if playlists.is_empty() {
        // Successful run, just nothing to show
        crate::exit("No playlists found for your recommendations".to_string());
    }

    info!("Discovered '{}' playlists!\n", playlists.len());

    let mut iter = 1;

    for playlist in playlists {
        let mut table = Table::new();

        let mut header = format!("{}. {}", iter, playlist.name);

        if playlist.track_count > 100 {
            header = "🔥 ".to_string() + header.as_str() + " 🔥";
        }

        table.set_titles(Row::new(vec![
            Cell::new(header.as_str()).style_spec("bFgcH2")
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Owner"),
            Cell::new(playlist.owner_display_name.as_str()),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Tracks"),
            Cell::new(playlist.track_count.to_string().as_str()),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("URL"),
            Cell::new(playlist.external_url.as_str()),
        ]));

        if let Some(image_url) = &playlist.image_url {
            table.add_row(Row::new(vec![
                Cell::new("Cover"),
                Cell::new(image_url.as_str()),
            ]));
        }

        table.printstd();

        iter += 1;
    }
}
