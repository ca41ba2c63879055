//! RSS 2.0 rendering with the iTunes podcast extension

use crate::model::{Feed, FeedEntry, FeedMetadata};
use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

const ITUNES_NS: &str = "http://www.itunes.com/dtds/podcast-1.0.dtd";
const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// MIME type to serve rendered feeds with
pub const RSS_CONTENT_TYPE: &str = "application/rss+xml";

/// Render a feed as a pretty-printed RSS document
pub fn render(feed: &Feed) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    rss.push_attribute(("xmlns:atom", ATOM_NS));
    rss.push_attribute(("xmlns:itunes", ITUNES_NS));
    writer.write_event(Event::Start(rss))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    write_channel(&mut writer, &feed.metadata)?;
    for entry in &feed.entries {
        write_item(&mut writer, entry)
            .with_context(|| format!("Failed to render entry: {}", entry.title))?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    let xml = String::from_utf8(writer.into_inner()).context("Rendered feed is not UTF-8")?;
    Ok(xml)
}

fn write_channel<W: Write>(writer: &mut Writer<W>, metadata: &FeedMetadata) -> Result<()> {
    text_element(writer, "title", &metadata.title)?;
    text_element(writer, "link", &metadata.link)?;
    text_element(writer, "description", &metadata.description)?;

    let mut self_link = BytesStart::new("atom:link");
    self_link.push_attribute(("href", metadata.link.as_str()));
    self_link.push_attribute(("rel", "self"));
    self_link.push_attribute(("type", RSS_CONTENT_TYPE));
    writer.write_event(Event::Empty(self_link))?;

    text_element(writer, "itunes:author", &metadata.author)?;

    if let Some(image) = &metadata.image {
        writer.write_event(Event::Start(BytesStart::new("image")))?;
        text_element(writer, "url", image)?;
        text_element(writer, "title", &metadata.title)?;
        text_element(writer, "link", &metadata.link)?;
        writer.write_event(Event::End(BytesEnd::new("image")))?;

        let mut itunes_image = BytesStart::new("itunes:image");
        itunes_image.push_attribute(("href", image.as_str()));
        writer.write_event(Event::Empty(itunes_image))?;
    }

    let mut category = BytesStart::new("itunes:category");
    category.push_attribute(("text", metadata.category));
    writer.write_event(Event::Empty(category))?;

    Ok(())
}

fn write_item<W: Write>(writer: &mut Writer<W>, entry: &FeedEntry) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("item")))?;

    text_element(writer, "title", &entry.title)?;
    text_element(writer, "description", &entry.description)?;

    let mut guid = BytesStart::new("guid");
    guid.push_attribute(("isPermaLink", "false"));
    writer.write_event(Event::Start(guid))?;
    writer.write_event(Event::Text(BytesText::new(&entry.id)))?;
    writer.write_event(Event::End(BytesEnd::new("guid")))?;

    let length = entry.length.to_string();
    let mut enclosure = BytesStart::new("enclosure");
    enclosure.push_attribute(("url", entry.enclosure_url.as_str()));
    enclosure.push_attribute(("length", length.as_str()));
    enclosure.push_attribute(("type", entry.mime_type));
    writer.write_event(Event::Empty(enclosure))?;

    text_element(writer, "pubDate", &entry.publish_time.to_rfc2822())?;

    writer.write_event(Event::End(BytesEnd::new("item")))?;
    Ok(())
}

fn text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PODCAST_CATEGORY;
    use chrono::{TimeZone, Utc};

    fn sample_feed(image: Option<&str>) -> Feed {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let entry = |n: i64, title: &str| FeedEntry {
            id: format!("/media/Tolkien/The%20Hobbit/{:02}.mp3", n),
            title: title.to_string(),
            description: format!("The Hobbit by Tolkien - {}", title),
            publish_time: t + chrono::Duration::seconds(90 * (n - 1)),
            enclosure_url: format!("/media/Tolkien/The%20Hobbit/{:02}.mp3", n),
            length: 1234,
            mime_type: "audio/mpeg",
        };

        Feed {
            metadata: FeedMetadata {
                title: "The Hobbit".to_string(),
                description: "The Hobbit by Tolkien".to_string(),
                author: "Tolkien".to_string(),
                link: "/feed/abc.xml".to_string(),
                image: image.map(String::from),
                category: PODCAST_CATEGORY,
            },
            entries: vec![entry(1, "Riddles & Darkness"), entry(2, "Out of the <Frying-Pan>")],
        }
    }

    #[test]
    fn test_render_contains_items_in_order() {
        let xml = render(&sample_feed(None)).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert_eq!(xml.matches("<item>").count(), 2);
        let first = xml.find("Riddles &amp; Darkness").unwrap();
        let second = xml.find("Out of the &lt;Frying-Pan&gt;").unwrap();
        assert!(first < second);
        assert!(xml.contains(
            r#"<enclosure url="/media/Tolkien/The%20Hobbit/01.mp3" length="1234" type="audio/mpeg"/>"#
        ));
        assert!(xml.contains("<itunes:category text=\"Arts\"/>"));
        assert!(!xml.contains("<itunes:image"));
    }

    #[test]
    fn test_render_pub_date_rfc2822_utc() {
        let xml = render(&sample_feed(None)).unwrap();
        assert!(xml.contains("<pubDate>Fri, 1 Mar 2024 08:00:00 +0000</pubDate>"));
        assert!(xml.contains("<pubDate>Fri, 1 Mar 2024 08:01:30 +0000</pubDate>"));
    }

    #[test]
    fn test_render_cover_image() {
        let xml = render(&sample_feed(Some("/media/Tolkien/The%20Hobbit/cover.jpg"))).unwrap();
        assert!(xml.contains("<url>/media/Tolkien/The%20Hobbit/cover.jpg</url>"));
        assert!(xml.contains("<itunes:image href=\"/media/Tolkien/The%20Hobbit/cover.jpg\"/>"));
    }
}
