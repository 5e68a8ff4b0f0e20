use quarry_chunk::{GridError, LIGHT_SUN, LightParam, Node, NodeContainer};
use quarry_content::CONTENT_AIR;
use quarry_geom::V3i;

/// Parent for a chunk loaded on its own: everything around it is sunlit air.
#[derive(Copy, Clone, Debug, Default)]
pub struct OpenAir;

impl NodeContainer for OpenAir {
    fn is_valid_position(&self, _p: V3i) -> bool {
        true
    }

    fn node(&self, _p: V3i) -> Result<Node, GridError> {
        Ok(Node::with_params(
            CONTENT_AIR,
            LightParam::new(LIGHT_SUN, 0).0,
            0,
        ))
    }

    fn set_node(&mut self, p: V3i, _node: Node) -> Result<(), GridError> {
        Err(GridError::InvalidPosition(p))
    }
}
