//! SVG serialisation of a [`Scene`].

use super::scene::{Scene, LABEL_OFFSET, NODE_RADIUS, PACKET_RADIUS};

const BACKGROUND: &str = "#F9FAFB";
const LABEL_COLOR: &str = "#374151";
const SELECTED_STROKE: &str = "#F59E0B";

/// Render the scene as a standalone SVG document.
pub fn scene_to_svg(scene: &Scene) -> String {
    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
        w = scene.size.width,
        h = scene.size.height
    ));
    svg.push_str(&format!("  <rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n", BACKGROUND));
    svg.push_str(&format!("  <g transform=\"{}\">\n", scene.transform.to_svg()));
    svg.push_str(&links_layer(scene));
    svg.push_str(&nodes_layer(scene));
    svg.push_str(&packets_layer(scene));
    svg.push_str("  </g>\n");
    svg.push_str("</svg>\n");
    svg
}

fn links_layer(scene: &Scene) -> String {
    let mut out = String::from("    <g class=\"links\">\n");
    for link in &scene.links {
        let stroke = if link.selected { SELECTED_STROKE } else { link.style.stroke };
        out.push_str(&format!(
            "      <line class=\"link\" data-id=\"{}\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\" opacity=\"0.7\"",
            escape(&link.id),
            link.from.x,
            link.from.y,
            link.to.x,
            link.to.y,
            stroke,
            link.style.width
        ));
        if let Some(dash) = link.style.dash {
            out.push_str(&format!(" stroke-dasharray=\"{}\"", dash));
        }
        out.push_str("/>\n");
    }
    out.push_str("    </g>\n");
    out
}

fn nodes_layer(scene: &Scene) -> String {
    let mut out = String::from("    <g class=\"nodes\">\n");
    for node in &scene.nodes {
        let stroke = if node.selected { SELECTED_STROKE } else { node.style.stroke };
        out.push_str(&format!(
            "      <g class=\"node{}\" data-id=\"{}\" transform=\"translate({},{})\">\n",
            if node.dragging { " dragging" } else { "" },
            escape(&node.id),
            node.center.x,
            node.center.y
        ));
        out.push_str(&format!(
            "        <circle r=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"2\"/>\n",
            NODE_RADIUS, node.style.fill, stroke
        ));
        out.push_str(&format!(
            "        <path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\" stroke-linecap=\"round\" stroke-linejoin=\"round\" transform=\"translate(-12,-12)\"/>\n",
            node.style.icon, LABEL_COLOR
        ));
        out.push_str(&format!(
            "        <text dy=\"{}\" text-anchor=\"middle\" font-size=\"12\" fill=\"{}\">{}</text>\n",
            LABEL_OFFSET,
            LABEL_COLOR,
            escape(&node.label)
        ));
        out.push_str("      </g>\n");
    }
    out.push_str("    </g>\n");
    out
}

fn packets_layer(scene: &Scene) -> String {
    let mut out = String::from("    <g class=\"packets\">\n");
    for packet in &scene.packets {
        out.push_str(&format!(
            "      <circle class=\"packet\" cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\" opacity=\"0.8\"/>\n",
            packet.center.x, packet.center.y, PACKET_RADIUS, packet.color
        ));
    }
    out.push_str("    </g>\n");
    out
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::scene::{draw_scene, DragPins};
    use crate::render::transform::{Size, ZoomTransform};
    use crate::simulation::{Packet, TrafficType};
    use crate::topology::reference_topology;

    #[test]
    fn test_layers_in_draw_order() {
        let store = reference_topology().unwrap();
        let packets = vec![Packet {
            id: "packet-1".to_string(),
            link_id: "link-1".to_string(),
            traffic_type: TrafficType::Voice,
            size: 512,
            progress: 0.5,
        }];
        let scene = draw_scene(&store, &packets, &DragPins::new(), ZoomTransform::IDENTITY, Size::new(800.0, 600.0));
        let svg = scene_to_svg(&scene);

        let links = svg.find(r#"class="links""#).unwrap();
        let nodes = svg.find(r#"class="nodes""#).unwrap();
        let packets = svg.find(r#"class="packets""#).unwrap();
        assert!(links < nodes && nodes < packets);
        assert_eq!(svg.matches(r#"<line class="link""#).count(), 5);
        assert_eq!(svg.matches(r#"class="packet""#).count(), 1);
        assert!(svg.contains(r#"cx="250" cy="250""#));
        assert!(svg.contains("Edge Router 1"));
    }

    #[test]
    fn test_document_is_complete() {
        let mut store = reference_topology().unwrap();
        store.select_node(Some("site-1"));
        let scene = draw_scene(&store, &[], &DragPins::new(), ZoomTransform::new(10.0, 20.0, 2.0), Size::new(400.0, 300.0));
        let svg = scene_to_svg(&scene);

        assert!(svg.starts_with("<svg "));
        assert!(svg.ends_with("</svg>\n"));
        assert_eq!(svg.matches("<g ").count(), svg.matches("</g>").count());
        // 4 groups for the view and layers, one per node
        assert_eq!(svg.matches("</g>").count(), 4 + 5);
        assert_eq!(svg.matches(SELECTED_STROKE).count(), 1);
        assert_eq!(svg.matches(r#"stroke-dasharray="5,5""#).count(), 1);
    }

    #[test]
    fn test_labels_are_escaped() {
        assert_eq!(escape("R&D <lab>"), "R&amp;D &lt;lab&gt;");
    }
}
